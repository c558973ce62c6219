use crate::history::view::HistoryView;
use parking_lot::RwLock;
use std::sync::Arc;

/// The writing end of one growing sequence.
///
/// Owned by the recorder. Views created from it share the same storage and
/// keep reading it after the track is replaced by a new session.
#[derive(Debug)]
pub(crate) struct Track<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T> Track<T> {
    pub(crate) fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Append-only; existing indices are never rewritten
    pub(crate) fn push(&mut self, value: T) {
        self.rows.write().push(value);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub(crate) fn view(&self) -> HistoryView<T> {
        HistoryView::new(self.rows.clone())
    }
}

impl<T: Copy> Track<T> {
    pub(crate) fn last(&self) -> Option<T> {
        self.rows.read().last().copied()
    }
}

impl<T> Default for Track<T> {
    fn default() -> Self {
        Self::new()
    }
}
