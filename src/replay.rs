//! Scripted gesture replay
//!
//! Drives a [`DragRegistry`] from a JSON script of timed pointer events so
//! a gesture can be exercised without a UI host. Timestamps come from the
//! script through a [`ManualClock`].
//!
//! ```json
//! {
//!   "options": { "allowTextSelection": false },
//!   "nodes": { "box": [{ "left": 100, "top": 40 }, { "left": 5, "top": 5 }] },
//!   "events": [
//!     { "phase": "down", "timeMs": 0,  "pageX": 110, "pageY": 50 },
//!     { "phase": "move", "timeMs": 16, "pageX": 120, "pageY": 55,
//!       "nodeOffsets": { "box": { "left": 15, "top": 10 } } },
//!     { "phase": "up",   "timeMs": 32, "pageX": 120, "pageY": 55 }
//!   ]
//! }
//! ```
//!
//! A node is given as its offset chain, outermost ancestor first; the last
//! entry is the tracked node. `nodeOffsets` moves a tracked node within its
//! parent before the event is dispatched.

use crate::input::document::Document;
use crate::input::types::{DefaultAction, PointerEvent, PointerPhase, Sample, Timestamp};
use crate::layout::{Node, NodeRef, RelatedNodes};
use crate::recorder::clock::ManualClock;
use crate::recorder::drag_data::EntityKey;
use crate::recorder::gesture::DragCallbacks;
use crate::registry::{DragOptions, DragRegistry};
use anyhow::{bail, Context};
use parking_lot::Mutex as ParkingMutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

const REPLAY_KEY: &str = "replay";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeOffset {
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptPhase {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptedEvent {
    pub phase: ScriptPhase,
    #[serde(default)]
    pub time_ms: Timestamp,
    #[serde(default)]
    pub node_offsets: BTreeMap<String, NodeOffset>,
    #[serde(flatten)]
    pub event: PointerEvent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default)]
    pub options: DragOptions,
    #[serde(default)]
    pub nodes: BTreeMap<String, Vec<NodeOffset>>,
    pub events: Vec<ScriptedEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse replay script")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        Self::from_json(&content)
    }
}

/// What the move callback saw at one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFrame {
    /// Gesture the row belongs to
    pub session_id: Uuid,
    pub row: usize,
    pub time_ms: Timestamp,
    pub elapsed_ms: Timestamp,
    pub pointer: Sample,
    /// Pointer minus node offset, per tracked node
    pub pointer_to_node: BTreeMap<String, Sample>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub gestures: usize,
    pub default_prevented: bool,
    pub frames: Vec<ReplayFrame>,
}

/// Run a script through a fresh registry and collect what callbacks saw
pub fn replay(script: &ReplayScript) -> anyhow::Result<ReplayReport> {
    let clock = Arc::new(ManualClock::new(0));
    let registry = DragRegistry::with_clock(Document::new(), clock.clone());

    let mut handles: BTreeMap<String, Arc<Node>> = BTreeMap::new();
    let mut related = RelatedNodes::new();
    for (name, chain) in &script.nodes {
        let Some(node) = build_chain(chain) else {
            bail!("Node {} has an empty offset chain", name);
        };
        related.insert(name.clone(), node.clone() as NodeRef);
        handles.insert(name.clone(), node);
    }

    let frames = Arc::new(ParkingMutex::new(Vec::new()));
    let gestures = Arc::new(ParkingMutex::new(0usize));

    let sink = frames.clone();
    let ends = gestures.clone();
    let callbacks = DragCallbacks::new()
        .on_move(move |_, data| {
            let row = data.length() - 1;
            let pointer_to_node = data
                .entity_keys()
                .into_iter()
                .filter_map(|key| match key {
                    EntityKey::Node(name) => {
                        let diff = data.diff(EntityKey::Pointer, name.as_str(), row).ok()?;
                        Some((name, diff))
                    }
                    EntityKey::Pointer => None,
                })
                .collect();
            sink.lock().push(ReplayFrame {
                session_id: data.session_id(),
                row,
                time_ms: data.timing().last().unwrap_or_default(),
                elapsed_ms: data.elapsed_ms(),
                pointer: data.pointer().last().unwrap_or_default(),
                pointer_to_node,
            });
        })
        .on_up(move |_| *ends.lock() += 1);

    registry
        .attach(REPLAY_KEY, callbacks, related, script.options)
        .context("Failed to attach replay listener")?;

    let mut default_prevented = false;
    for (i, scripted) in script.events.iter().enumerate() {
        clock.set(scripted.time_ms);
        for (name, offset) in &scripted.node_offsets {
            let Some(node) = handles.get(name) else {
                bail!("Event {} moves unknown node {}", i, name);
            };
            node.set_offset(offset.left, offset.top);
        }

        match scripted.phase {
            ScriptPhase::Down => {
                if registry.dispatch_down(&scripted.event) == DefaultAction::Prevent {
                    default_prevented = true;
                }
            }
            ScriptPhase::Move => {
                registry.document().dispatch(PointerPhase::Move, &scripted.event);
            }
            ScriptPhase::Up => {
                registry.document().dispatch(PointerPhase::Up, &scripted.event);
            }
        }
    }

    if registry.is_dragging() {
        tracing::warn!("Replay script ended with a gesture still active");
    }
    registry.detach(REPLAY_KEY)?;

    let frames = std::mem::take(&mut *frames.lock());
    let gestures = *gestures.lock();
    tracing::info!("Replayed {} events: {} gestures, {} frames", script.events.len(), gestures, frames.len());

    Ok(ReplayReport {
        gestures,
        default_prevented,
        frames,
    })
}

fn build_chain(chain: &[NodeOffset]) -> Option<Arc<Node>> {
    let mut parent: NodeRef = Node::root();
    let mut last = None;
    for offset in chain {
        let node = Node::new(parent, offset.left, offset.top);
        parent = node.clone() as NodeRef;
        last = Some(node);
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCRIPT: &str = r#"{
        "nodes": { "box": [{ "left": 100, "top": 40 }, { "left": 5, "top": 5 }] },
        "events": [
            { "phase": "down", "timeMs": 1000, "pageX": 110, "pageY": 50 },
            { "phase": "move", "timeMs": 1016, "pageX": 120, "pageY": 55,
              "nodeOffsets": { "box": { "left": 15, "top": 10 } } },
            { "phase": "move", "timeMs": 1032, "pageX": 130, "pageY": 60 },
            { "phase": "up", "timeMs": 1048, "pageX": 130, "pageY": 60 },
            { "phase": "move", "timeMs": 1064, "pageX": 500, "pageY": 500 }
        ]
    }"#;

    #[test]
    fn test_replay_script() {
        let script = ReplayScript::from_json(SCRIPT).unwrap();
        let report = replay(&script).unwrap();

        assert_eq!(report.gestures, 1);
        assert!(report.default_prevented);
        assert_eq!(report.frames.len(), 2, "moves after pointer-up must not be recorded");

        let frame = &report.frames[0];
        assert_eq!(frame.row, 1);
        assert_eq!(frame.time_ms, 1016);
        assert_eq!(frame.elapsed_ms, 16);
        assert_eq!(frame.pointer, Sample::new(120.0, 55.0));
        assert_eq!(frame.pointer_to_node["box"], Sample::new(5.0, 5.0));

        let frame = &report.frames[1];
        assert_eq!(frame.row, 2);
        assert_eq!(frame.elapsed_ms, 32);
        assert_eq!(frame.pointer_to_node["box"], Sample::new(15.0, 10.0));
    }

    #[test]
    fn test_report_json_carries_session_ids() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        // Second gesture after the first pointer-up
        script.events.push(ScriptedEvent {
            phase: ScriptPhase::Down,
            time_ms: 2000,
            node_offsets: BTreeMap::new(),
            event: PointerEvent::new(0.0, 0.0),
        });
        script.events.push(ScriptedEvent {
            phase: ScriptPhase::Move,
            time_ms: 2016,
            node_offsets: BTreeMap::new(),
            event: PointerEvent::new(1.0, 1.0),
        });

        let report = replay(&script).unwrap();
        assert_eq!(report.frames.len(), 3);
        assert_eq!(report.frames[0].session_id, report.frames[1].session_id);
        assert_ne!(report.frames[1].session_id, report.frames[2].session_id);

        let json = serde_json::to_value(&report).unwrap();
        let first = &json["frames"][0];
        assert_eq!(first["sessionId"], report.frames[0].session_id.to_string());
        assert_eq!(first["pointerToNode"]["box"]["x"], 5.0);

        let parsed: ReplayReport = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.frames, report.frames);
    }

    #[test]
    fn test_replay_allows_selection() {
        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.options = DragOptions::new().with_text_selection(true);

        let report = replay(&script).unwrap();
        assert!(!report.default_prevented);
    }

    #[test]
    fn test_replay_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let script = ReplayScript::from_path(file.path()).unwrap();
        assert_eq!(script.events.len(), 5);
        assert_eq!(script.events[0].phase, ScriptPhase::Down);
        assert_eq!(script.events[0].event.position(), Sample::new(110.0, 50.0));
    }

    #[test]
    fn test_replay_rejects_unknown_node() {
        let script = ReplayScript::from_json(
            r#"{ "events": [{ "phase": "down", "pageX": 0, "pageY": 0,
                 "nodeOffsets": { "ghost": { "left": 1, "top": 1 } } }] }"#,
        )
        .unwrap();

        let err = replay(&script).unwrap_err();
        assert!(err.to_string().contains("ghost"), "unexpected error: {}", err);
    }

    #[test]
    fn test_replay_rejects_empty_chain() {
        let script = ReplayScript::from_json(r#"{ "nodes": { "box": [] }, "events": [] }"#).unwrap();
        assert!(replay(&script).is_err());
    }

    #[test]
    fn test_demo_script() {
        let script = ReplayScript::from_json(include_str!("../demos/gesture.json")).unwrap();
        let report = replay(&script).unwrap();

        assert_eq!(report.gestures, 1);
        assert_eq!(report.frames.len(), 2);
        let last = report.frames.last().unwrap();
        assert_eq!(last.elapsed_ms, 33);
        assert_eq!(last.pointer_to_node["panel"], Sample::new(12.0, 12.0));
        assert_eq!(last.pointer_to_node["handle"], Sample::new(24.0, 13.0));
    }

    #[test]
    fn test_malformed_script() {
        assert!(ReplayScript::from_json(r#"{ "events": [{ "phase": "hover" }] }"#).is_err());
    }
}
