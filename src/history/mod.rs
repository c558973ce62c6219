//! Gesture history storage
//!
//! A [`Track`] is the recorder's append-only sequence; a [`HistoryView`] is
//! the read-only alias over it that callbacks receive.

mod track;
pub mod view;

pub(crate) use track::Track;
pub use view::{HistoryView, Iter};
