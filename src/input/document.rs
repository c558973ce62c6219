//! Document-level pointer listener table
//!
//! Move and up listeners for an active gesture are installed here, on the
//! root, so the gesture keeps tracking when the pointer leaves the element.
//! The host forwards every document pointer-move/up to [`Document::dispatch`].

use crate::input::types::{PointerEvent, PointerPhase};
use parking_lot::Mutex as ParkingMutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Boxed document listener
pub type PointerListener = Box<dyn FnMut(&PointerEvent) + Send>;

type SharedListener = Arc<ParkingMutex<PointerListener>>;

/// Handle identifying one installed listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct DocumentInner {
    next_id: AtomicU64,
    // Ordered by id, so dispatch follows installation order
    listeners: ParkingMutex<BTreeMap<ListenerId, (PointerPhase, SharedListener)>>,
}

/// Shared handle to the document root
#[derive(Clone, Default)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

/// Non-owning document handle, held by listeners that remove themselves
#[derive(Clone)]
pub struct WeakDocument {
    inner: Weak<DocumentInner>,
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.inner.upgrade().map(|inner| Document { inner })
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn add_listener<F>(&self, phase: PointerPhase, listener: F) -> ListenerId
    where
        F: FnMut(&PointerEvent) + Send + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let listener: PointerListener = Box::new(listener);
        self.inner
            .listeners
            .lock()
            .insert(id, (phase, Arc::new(ParkingMutex::new(listener))));
        tracing::trace!("Installed {} listener {:?}", phase, id);
        id
    }

    /// Remove a listener. Returns false if it was not installed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.inner.listeners.lock().remove(&id).is_some();
        if removed {
            tracing::trace!("Removed listener {:?}", id);
        }
        removed
    }

    /// Deliver an event to every listener of `phase`. Returns how many ran.
    ///
    /// The set of candidate listeners is fixed when dispatch starts; a
    /// listener removed by an earlier one in the same dispatch is skipped.
    pub fn dispatch(&self, phase: PointerPhase, event: &PointerEvent) -> usize {
        let ids: Vec<ListenerId> = self
            .inner
            .listeners
            .lock()
            .iter()
            .filter(|(_, (p, _))| *p == phase)
            .map(|(id, _)| *id)
            .collect();

        let mut invoked = 0;
        for id in ids {
            let listener = match self.inner.listeners.lock().get(&id) {
                Some((_, listener)) => listener.clone(),
                None => continue,
            };
            // Table lock is released here; the listener may edit the table
            let mut guard = listener.lock();
            (&mut **guard)(event);
            invoked += 1;
        }
        invoked
    }

    pub fn listener_count(&self, phase: PointerPhase) -> usize {
        self.inner
            .listeners
            .lock()
            .values()
            .filter(|(p, _)| *p == phase)
            .count()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("move_listeners", &self.listener_count(PointerPhase::Move))
            .field("up_listeners", &self.listener_count(PointerPhase::Up))
            .finish()
    }
}
