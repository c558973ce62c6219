//! Per-move snapshot of views handed to the move callback

use crate::error::{GestureError, GestureResult};
use crate::history::HistoryView;
use crate::input::types::{Sample, Timestamp};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Names a tracked history: the pointer, or one related node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Pointer,
    Node(String),
}

impl EntityKey {
    pub fn node(name: impl Into<String>) -> Self {
        EntityKey::Node(name.into())
    }
}

impl From<&str> for EntityKey {
    fn from(name: &str) -> Self {
        EntityKey::Node(name.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(name: String) -> Self {
        EntityKey::Node(name)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Pointer => write!(f, "pointer"),
            EntityKey::Node(name) => write!(f, "{}", name),
        }
    }
}

/// Accumulated history of the current gesture, as seen by the move callback.
///
/// Every view aliases the recorder's live storage. All views share one row
/// count.
#[derive(Debug, Clone)]
pub struct DragData {
    session_id: Uuid,
    pointer: HistoryView<Sample>,
    nodes: BTreeMap<String, HistoryView<Sample>>,
    timing: HistoryView<Timestamp>,
}

impl DragData {
    pub(crate) fn new(
        session_id: Uuid,
        pointer: HistoryView<Sample>,
        nodes: BTreeMap<String, HistoryView<Sample>>,
        timing: HistoryView<Timestamp>,
    ) -> Self {
        Self {
            session_id,
            pointer,
            nodes,
            timing,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Page positions of the pointer
    pub fn pointer(&self) -> &HistoryView<Sample> {
        &self.pointer
    }

    /// Epoch-millisecond time of each row
    pub fn timing(&self) -> &HistoryView<Timestamp> {
        &self.timing
    }

    /// Document offsets of a related node
    pub fn entity(&self, name: &str) -> Option<&HistoryView<Sample>> {
        self.nodes.get(name)
    }

    pub fn view(&self, key: &EntityKey) -> GestureResult<&HistoryView<Sample>> {
        match key {
            EntityKey::Pointer => Ok(&self.pointer),
            EntityKey::Node(name) => self
                .nodes
                .get(name)
                .ok_or_else(|| GestureError::UnknownEntity(name.clone())),
        }
    }

    /// Every tracked key, pointer first, then nodes in name order
    pub fn entity_keys(&self) -> Vec<EntityKey> {
        std::iter::once(EntityKey::Pointer)
            .chain(self.nodes.keys().cloned().map(EntityKey::Node))
            .collect()
    }

    /// Number of rows recorded so far
    pub fn length(&self) -> usize {
        self.pointer.len()
    }

    /// `a[index] - b[index]`
    pub fn diff(
        &self,
        a: impl Into<EntityKey>,
        b: impl Into<EntityKey>,
        index: usize,
    ) -> GestureResult<Sample> {
        let (a, b) = (self.view(&a.into())?, self.view(&b.into())?);
        let len = self.length();
        if index >= len {
            return Err(GestureError::OutOfRange { index, len });
        }
        Ok(a.get(index)? - b.get(index)?)
    }

    pub fn first(&self, a: impl Into<EntityKey>, b: impl Into<EntityKey>) -> GestureResult<Sample> {
        self.diff(a, b, 0)
    }

    pub fn last(&self, a: impl Into<EntityKey>, b: impl Into<EntityKey>) -> GestureResult<Sample> {
        let index = self
            .length()
            .checked_sub(1)
            .ok_or(GestureError::OutOfRange { index: 0, len: 0 })?;
        self.diff(a, b, index)
    }

    /// Milliseconds between the first and latest row
    pub fn elapsed_ms(&self) -> Timestamp {
        match (self.timing.first(), self.timing.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Track;

    fn drag_data(pointer: &[(f64, f64)], handle: &[(f64, f64)]) -> (DragData, Vec<Track<Sample>>) {
        let mut p = Track::new();
        let mut h = Track::new();
        let mut t = Track::new();
        for (i, (x, y)) in pointer.iter().enumerate() {
            p.push(Sample::new(*x, *y));
            t.push(1_000 + i as Timestamp * 16);
        }
        for (x, y) in handle {
            h.push(Sample::new(*x, *y));
        }

        let mut nodes = BTreeMap::new();
        nodes.insert("handle".to_string(), h.view());
        let data = DragData::new(Uuid::new_v4(), p.view(), nodes, t.view());
        (data, vec![p, h])
    }

    #[test]
    fn test_diff_is_componentwise() {
        let (data, _tracks) = drag_data(
            &[(10.0, 10.0), (20.0, 15.0), (30.0, 25.0)],
            &[(5.0, 5.0), (5.0, 5.0), (12.0, 7.0)],
        );

        assert_eq!(data.length(), 3);
        for i in 0..3 {
            let expected = data.pointer().get(i).unwrap() - data.entity("handle").unwrap().get(i).unwrap();
            assert_eq!(data.diff(EntityKey::Pointer, "handle", i), Ok(expected));
        }
        assert_eq!(data.diff(EntityKey::Pointer, "handle", 2), Ok(Sample::new(18.0, 18.0)));
    }

    #[test]
    fn test_diff_out_of_range() {
        let (data, _tracks) = drag_data(&[(1.0, 1.0), (2.0, 2.0)], &[(0.0, 0.0), (0.0, 0.0)]);

        assert_eq!(
            data.diff(EntityKey::Pointer, "handle", 2),
            Err(GestureError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_first_and_last() {
        let (data, _tracks) = drag_data(&[(1.0, 2.0), (4.0, 8.0)], &[(1.0, 1.0), (2.0, 2.0)]);

        assert_eq!(data.first(EntityKey::Pointer, "handle"), data.diff(EntityKey::Pointer, "handle", 0));
        assert_eq!(data.last(EntityKey::Pointer, "handle"), data.diff(EntityKey::Pointer, "handle", 1));
        assert_eq!(data.last("handle", EntityKey::Pointer), Ok(Sample::new(-2.0, -6.0)));
    }

    #[test]
    fn test_last_on_empty_history() {
        let (data, _tracks) = drag_data(&[], &[]);
        assert_eq!(
            data.last(EntityKey::Pointer, EntityKey::Pointer),
            Err(GestureError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_unknown_entity() {
        let (data, _tracks) = drag_data(&[(1.0, 1.0)], &[(1.0, 1.0)]);

        assert_eq!(
            data.first("missing", EntityKey::Pointer),
            Err(GestureError::UnknownEntity("missing".to_string()))
        );
        assert!(data.entity("missing").is_none());
    }

    #[test]
    fn test_entity_keys_and_elapsed() {
        let (data, _tracks) = drag_data(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)], &[(0.0, 0.0); 3]);

        assert_eq!(data.entity_keys(), vec![EntityKey::Pointer, EntityKey::node("handle")]);
        assert_eq!(data.elapsed_ms(), 32);
    }
}
