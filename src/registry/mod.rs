//! Per-element drag listener registry
//!
//! The embedding application keeps one [`DragRegistry`] per element and
//! forwards that element's pointer-down events to
//! [`DragRegistry::dispatch_down`]. Each binding under a key owns a
//! [`GestureRecorder`]. While a gesture is active the binding's move and up
//! listeners live on the shared [`Document`].
//!
//! There is no timeout: if pointer-up never reaches the document, the
//! gesture stays active and its listeners stay installed until
//! [`DragRegistry::detach`].

pub mod options;

pub use options::DragOptions;

use crate::error::{GestureError, GestureResult};
use crate::input::document::{Document, ListenerId};
use crate::input::types::{DefaultAction, PointerEvent, PointerPhase};
use crate::layout::RelatedNodes;
use crate::recorder::clock::{Clock, SystemClock};
use crate::recorder::gesture::{DragCallbacks, GestureRecorder};
use parking_lot::Mutex as ParkingMutex;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Listeners installed on the document for one gesture
#[derive(Debug, Clone, Copy)]
struct InstalledListeners {
    move_id: ListenerId,
    up_id: ListenerId,
}

impl InstalledListeners {
    fn remove_from(&self, document: &Document) {
        document.remove_listener(self.move_id);
        document.remove_listener(self.up_id);
    }
}

struct Binding {
    key: String,
    options: DragOptions,
    recorder: Arc<ParkingMutex<GestureRecorder>>,
    active: Arc<AtomicBool>,
    // Last installed pair, for detach
    installed: ParkingMutex<Option<InstalledListeners>>,
}

pub struct DragRegistry {
    document: Document,
    clock: Arc<dyn Clock>,
    bindings: ParkingMutex<BTreeMap<String, Arc<Binding>>>,
}

impl DragRegistry {
    pub fn new(document: Document) -> Self {
        Self::with_clock(document, Arc::new(SystemClock))
    }

    pub fn with_clock(document: Document, clock: Arc<dyn Clock>) -> Self {
        Self {
            document,
            clock,
            bindings: ParkingMutex::new(BTreeMap::new()),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Bind a drag gesture under `key`
    pub fn attach(
        &self,
        key: impl Into<String>,
        callbacks: DragCallbacks,
        related: RelatedNodes,
        options: DragOptions,
    ) -> GestureResult<()> {
        let mut bindings = self.bindings.lock();
        let entry = match bindings.entry(key.into()) {
            Entry::Occupied(occupied) => {
                return Err(GestureError::DuplicateKey(occupied.key().clone()));
            }
            Entry::Vacant(vacant) => vacant,
        };

        let node_count = related.len();
        let recorder = GestureRecorder::with_clock(related, callbacks, self.clock.clone());
        let binding = Binding {
            key: entry.key().clone(),
            options,
            active: recorder.active_flag(),
            recorder: Arc::new(ParkingMutex::new(recorder)),
            installed: ParkingMutex::new(None),
        };

        tracing::info!(
            "Drag listener attached (key={}, nodes={}, allow_text_selection={})",
            binding.key,
            node_count,
            options.allow_text_selection
        );
        entry.insert(Arc::new(binding));
        Ok(())
    }

    /// Remove the binding and whatever listeners it last installed
    pub fn detach(&self, key: &str) -> GestureResult<()> {
        let binding = self
            .bindings
            .lock()
            .remove(key)
            .ok_or_else(|| GestureError::UnknownKey(key.to_string()))?;

        if let Some(installed) = binding.installed.lock().take() {
            installed.remove_from(&self.document);
        }
        if binding.active.swap(false, Ordering::SeqCst) {
            tracing::warn!("Drag listener {} detached during an active gesture", key);
        }

        tracing::info!("Drag listener detached (key={})", key);
        Ok(())
    }

    /// True while any binding on this element has a gesture in progress
    pub fn is_dragging(&self) -> bool {
        self.bindings
            .lock()
            .values()
            .any(|b| b.active.load(Ordering::SeqCst))
    }

    pub fn is_key_dragging(&self, key: &str) -> GestureResult<bool> {
        self.bindings
            .lock()
            .get(key)
            .map(|b| b.active.load(Ordering::SeqCst))
            .ok_or_else(|| GestureError::UnknownKey(key.to_string()))
    }

    pub fn keys(&self) -> Vec<String> {
        self.bindings.lock().keys().cloned().collect()
    }

    /// Pointer-down on the element. Starts a gesture for every binding.
    ///
    /// Returns `Prevent` if any binding suppresses the host's default
    /// behavior.
    pub fn dispatch_down(&self, event: &PointerEvent) -> DefaultAction {
        let bindings: Vec<Arc<Binding>> = self.bindings.lock().values().cloned().collect();

        let mut action = DefaultAction::Allow;
        for binding in bindings {
            self.start_gesture(&binding, event);
            if !binding.options.allow_text_selection {
                action = DefaultAction::Prevent;
            }
        }
        action
    }

    fn start_gesture(&self, binding: &Binding, event: &PointerEvent) {
        if !binding.recorder.lock().start(event) {
            return;
        }

        // Each gesture removes exactly the listeners it installed
        let session: Arc<ParkingMutex<Option<InstalledListeners>>> = Arc::new(ParkingMutex::new(None));

        let recorder = binding.recorder.clone();
        let move_id = self.document.add_listener(PointerPhase::Move, move |e| {
            recorder.lock().on_move(e);
        });

        let recorder = binding.recorder.clone();
        let document = self.document.downgrade();
        let own = session.clone();
        let key = binding.key.clone();
        let up_id = self.document.add_listener(PointerPhase::Up, move |e| {
            recorder.lock().end(e);
            if let (Some(document), Some(installed)) = (document.upgrade(), own.lock().take()) {
                installed.remove_from(&document);
                tracing::trace!("Removed gesture listeners for {}", key);
            }
        });

        let installed = InstalledListeners { move_id, up_id };
        *session.lock() = Some(installed);
        *binding.installed.lock() = Some(installed);

        // Listeners are recorded before the down callback, so a detach
        // from inside it removes them
        binding.recorder.lock().notify_down(event);
    }
}

impl std::fmt::Debug for DragRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragRegistry")
            .field("keys", &self.keys())
            .field("dragging", &self.is_dragging())
            .field("document", &self.document)
            .finish()
    }
}
