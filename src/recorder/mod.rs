//! Gesture recording
//!
//! The recorder appends one row per pointer event and hands read-only
//! views of the accumulated history to the caller's callbacks.

pub mod clock;
pub mod drag_data;
pub mod gesture;

pub use clock::{Clock, ManualClock, SystemClock};
pub use drag_data::{DragData, EntityKey};
pub use gesture::{DownCallback, DragCallbacks, GestureRecorder, MoveCallback, UpCallback};
