//! drag-history - drag gesture tracking with read-only positional history.
//!
//! A [`DragRegistry`] binds gesture listeners to one element. On pointer-down
//! a [`GestureRecorder`] starts recording one row per pointer event: the
//! document offset of every related node, the pointer position, and a
//! timestamp. The move callback receives a [`DragData`] of [`HistoryView`]s
//! that alias the live history and can never modify it.

pub mod error;
pub mod history;
pub mod input;
pub mod layout;
pub mod recorder;
pub mod registry;
pub mod replay;

pub use error::{GestureError, GestureResult};
pub use history::HistoryView;
pub use input::{DefaultAction, Document, PointerEvent, PointerPhase, Sample, Timestamp};
pub use layout::{cumulative_offset, LayoutNode, Node, NodeRef, RelatedNodes};
pub use recorder::{Clock, DragCallbacks, DragData, EntityKey, GestureRecorder, ManualClock, SystemClock};
pub use registry::{DragOptions, DragRegistry};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging to stderr.
///
/// `RUST_LOG` takes precedence over the default filter.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "drag_history=trace"
    } else {
        "drag_history=debug"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
