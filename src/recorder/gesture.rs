//! Gesture recorder
//!
//! Owns the history of one drag gesture at a time: a sample track per
//! related node, one for the pointer, and one for timestamps. Every
//! pointer-down or pointer-move appends exactly one row across all tracks.

use crate::history::Track;
use crate::input::types::{PointerEvent, Sample, Timestamp};
use crate::layout::{cumulative_offset, RelatedNodes};
use crate::recorder::clock::{Clock, SystemClock};
use crate::recorder::drag_data::DragData;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub type DownCallback = Box<dyn FnMut(&PointerEvent) + Send>;
pub type MoveCallback = Box<dyn FnMut(&PointerEvent, &DragData) + Send>;
pub type UpCallback = Box<dyn FnMut(&PointerEvent) + Send>;

/// Callbacks for the three gesture phases. Unset phases are no-ops.
#[derive(Default)]
pub struct DragCallbacks {
    on_down: Option<DownCallback>,
    on_move: Option<MoveCallback>,
    on_up: Option<UpCallback>,
}

impl DragCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_down<F>(mut self, f: F) -> Self
    where
        F: FnMut(&PointerEvent) + Send + 'static,
    {
        self.on_down = Some(Box::new(f));
        self
    }

    pub fn on_move<F>(mut self, f: F) -> Self
    where
        F: FnMut(&PointerEvent, &DragData) + Send + 'static,
    {
        self.on_move = Some(Box::new(f));
        self
    }

    pub fn on_up<F>(mut self, f: F) -> Self
    where
        F: FnMut(&PointerEvent) + Send + 'static,
    {
        self.on_up = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for DragCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragCallbacks")
            .field("on_down", &self.on_down.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_up", &self.on_up.is_some())
            .finish()
    }
}

pub struct GestureRecorder {
    related: RelatedNodes,
    callbacks: DragCallbacks,
    clock: Arc<dyn Clock>,
    // Shared so the state can be read while a callback holds the recorder
    active: Arc<AtomicBool>,

    session_id: Uuid,
    nodes: BTreeMap<String, Track<Sample>>,
    pointer: Track<Sample>,
    timing: Track<Timestamp>,
}

impl GestureRecorder {
    pub fn new(related: RelatedNodes, callbacks: DragCallbacks) -> Self {
        Self::with_clock(related, callbacks, Arc::new(SystemClock))
    }

    pub fn with_clock(related: RelatedNodes, callbacks: DragCallbacks, clock: Arc<dyn Clock>) -> Self {
        let nodes = related.keys().map(|k| (k.clone(), Track::new())).collect();
        Self {
            related,
            callbacks,
            clock,
            active: Arc::new(AtomicBool::new(false)),
            session_id: Uuid::nil(),
            nodes,
            pointer: Track::new(),
            timing: Track::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Handle to the active flag, readable without locking the recorder
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Rows recorded in the current (or last) gesture
    pub fn len(&self) -> usize {
        self.pointer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a gesture and run the down callback. Returns false, changing
    /// nothing, if one is active.
    pub fn begin(&mut self, event: &PointerEvent) -> bool {
        if !self.start(event) {
            return false;
        }
        self.notify_down(event);
        true
    }

    /// Reset the tracks and record the first row without running the down
    /// callback. Hosts that install listeners between the two steps call
    /// [`GestureRecorder::notify_down`] afterwards.
    pub fn start(&mut self, event: &PointerEvent) -> bool {
        if self.is_active() {
            tracing::warn!(
                "Ignoring pointer-down: gesture {} is still active ({} rows)",
                self.session_id,
                self.len()
            );
            return false;
        }

        // Fresh storage; views from the previous gesture keep their rows
        self.session_id = Uuid::new_v4();
        self.nodes = self.related.keys().map(|k| (k.clone(), Track::new())).collect();
        self.pointer = Track::new();
        self.timing = Track::new();
        self.active.store(true, Ordering::SeqCst);

        self.append_row(event);

        tracing::debug!(
            "Gesture {} started at ({}, {}) tracking {} nodes",
            self.session_id,
            event.page_x,
            event.page_y,
            self.nodes.len()
        );
        true
    }

    /// Run the down callback for a gesture started with `start`
    pub fn notify_down(&mut self, event: &PointerEvent) {
        if let Some(on_down) = self.callbacks.on_down.as_mut() {
            on_down(event);
        }
    }

    /// Record a move and hand the accumulated history to the move callback
    pub fn on_move(&mut self, event: &PointerEvent) -> bool {
        if !self.is_active() {
            tracing::trace!("Ignoring pointer-move outside a gesture");
            return false;
        }

        self.append_row(event);
        let drag_data = self.drag_data();

        if let Some(on_move) = self.callbacks.on_move.as_mut() {
            on_move(event, &drag_data);
        }
        true
    }

    /// Finish the gesture after running the up callback
    pub fn end(&mut self, event: &PointerEvent) -> bool {
        if !self.is_active() {
            tracing::trace!("Ignoring pointer-up outside a gesture");
            return false;
        }

        if let Some(on_up) = self.callbacks.on_up.as_mut() {
            on_up(event);
        }
        self.active.store(false, Ordering::SeqCst);

        tracing::debug!("Gesture {} ended after {} rows", self.session_id, self.len());
        true
    }

    /// Views over the current gesture's tracks
    pub fn drag_data(&self) -> DragData {
        let nodes = self
            .nodes
            .iter()
            .map(|(k, track)| (k.clone(), track.view()))
            .collect();
        DragData::new(self.session_id, self.pointer.view(), nodes, self.timing.view())
    }

    fn append_row(&mut self, event: &PointerEvent) {
        for (key, node) in &self.related {
            let offset = cumulative_offset(&**node);
            if let Some(track) = self.nodes.get_mut(key) {
                track.push(offset);
            }
        }

        self.pointer.push(event.position());

        let mut now = self.clock.now_ms();
        if let Some(previous) = self.timing.last() {
            if now < previous {
                tracing::warn!(
                    "Clock went backwards by {}ms during gesture {}; reusing previous timestamp",
                    previous - now,
                    self.session_id
                );
                now = previous;
            }
        }
        self.timing.push(now);

        tracing::trace!(
            "Gesture {} row {}: pointer=({}, {}) t={}",
            self.session_id,
            self.len() - 1,
            event.page_x,
            event.page_y,
            now
        );
    }
}

impl std::fmt::Debug for GestureRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecorder")
            .field("session_id", &self.session_id)
            .field("active", &self.is_active())
            .field("rows", &self.len())
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}
