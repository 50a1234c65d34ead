//! Structured artifacts mined from assistant replies.

use serde::{Deserialize, Serialize};

/// What an assistant reply yielded for the display surface.
///
/// An artifact with neither `diagram` nor `code` counts as "no artifact".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Mermaid source from the first fenced `mermaid` block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<String>,
    /// Source/markup from the first fenced code block with a recognised tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// The reply with extracted blocks removed, trimmed.
    #[serde(default)]
    pub text: String,
}

impl Artifact {
    /// Returns true when neither a diagram nor code was captured.
    pub fn is_empty(&self) -> bool {
        self.diagram.is_none() && self.code.is_none()
    }

    /// Merges `update` into `self` field by field.
    ///
    /// Fields absent from `update` keep their previous value; `text` follows
    /// the latest reply. An empty update changes nothing and returns `false`.
    pub fn merge(&mut self, update: Artifact) -> bool {
        if update.is_empty() {
            return false;
        }
        if let Some(diagram) = update.diagram {
            self.diagram = Some(diagram);
        }
        if let Some(code) = update.code {
            self.code = Some(code);
        }
        self.text = update.text;
        true
    }
}
