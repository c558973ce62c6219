use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Epoch milliseconds
pub type Timestamp = i64;

/// A document-relative 2D position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Sample {
    type Output = Sample;

    fn sub(self, rhs: Sample) -> Sample {
        Sample {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pointer event as delivered by the host toolkit
///
/// Coordinates are page-relative; no scroll correction is applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub page_x: f64,
    pub page_y: f64,
    #[serde(default)]
    pub active_modifiers: Vec<String>,
}

impl PointerEvent {
    pub fn new(page_x: f64, page_y: f64) -> Self {
        Self {
            page_x,
            page_y,
            active_modifiers: Vec::new(),
        }
    }

    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.active_modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Pointer position as a sample
    pub fn position(&self) -> Sample {
        Sample::new(self.page_x, self.page_y)
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.active_modifiers.iter().any(|m| m == modifier)
    }
}

/// Phase of a document-level pointer listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Move,
    Up,
}

impl fmt::Display for PointerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerPhase::Move => write!(f, "move"),
            PointerPhase::Up => write!(f, "up"),
        }
    }
}

/// What the host should do with its default pointer-down behavior
/// (text selection, native drag)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Allow,
    Prevent,
}
