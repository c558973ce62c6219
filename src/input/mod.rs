//! Pointer input plumbing
//!
//! Event types delivered by the host toolkit and the document-level
//! listener table that gestures install their move/up handlers on.

pub mod document;
pub mod types;

pub use document::{Document, ListenerId, PointerListener, WeakDocument};
pub use types::{DefaultAction, PointerEvent, PointerPhase, Sample, Timestamp};
