use serde::{Deserialize, Serialize};

/// Per-binding drag options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DragOptions {
    /// Keep the host's default pointer-down behavior (text selection,
    /// native drag). Suppressed when false.
    pub allow_text_selection: bool,
}

impl DragOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_selection(mut self, allow: bool) -> Self {
        self.allow_text_selection = allow;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
