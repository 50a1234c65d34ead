//! Artifact extraction from free-form assistant replies.
//!
//! Fences are matched line-anchored: a block opens on a line that is exactly
//! ```` ```<tag> ```` and closes on the first following line that is exactly
//! ```` ``` ```` (trailing spaces allowed). Only the first block of each kind
//! is captured; later blocks stay in `text`.

use crate::project::Artifact;
use regex::Regex;
use std::sync::OnceLock;

/// Tag of the diagram-description language.
pub const DIAGRAM_TAG: &str = "mermaid";

/// Tags recognised as source/markup code blocks.
pub const DEFAULT_CODE_TAGS: &[&str] = &[
    "typescript",
    "javascript",
    "html",
    "css",
    "tsx",
    "jsx",
    "ts",
    "js",
];

static DIAGRAM_FENCE: OnceLock<Regex> = OnceLock::new();
static CODE_FENCE: OnceLock<Regex> = OnceLock::new();

fn fence_pattern(tags: &[&str]) -> String {
    let alternation = tags
        .iter()
        .map(|tag| regex::escape(tag))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?ms)^```(?:{alternation})[ \t]*\r?\n(.*?)\r?\n```[ \t]*\r?$")
}

fn diagram_fence() -> &'static Regex {
    DIAGRAM_FENCE
        .get_or_init(|| Regex::new(&fence_pattern(&[DIAGRAM_TAG])).expect("Invalid diagram fence pattern"))
}

fn code_fence() -> &'static Regex {
    CODE_FENCE
        .get_or_init(|| Regex::new(&fence_pattern(DEFAULT_CODE_TAGS)).expect("Invalid code fence pattern"))
}

/// Splits a reply into display text plus the first diagram and code blocks.
#[derive(Debug, Clone)]
pub struct ArtifactExtractor {
    diagram: Regex,
    code: Regex,
}

impl Default for ArtifactExtractor {
    fn default() -> Self {
        Self {
            diagram: diagram_fence().clone(),
            code: code_fence().clone(),
        }
    }
}

impl ArtifactExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an extractor recognising a custom set of code tags.
    pub fn with_code_tags(tags: &[&str]) -> Result<Self, regex::Error> {
        if tags.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            diagram: diagram_fence().clone(),
            code: Regex::new(&fence_pattern(tags))?,
        })
    }

    /// Extracts artifacts from `reply`.
    ///
    /// The diagram is removed first; the code search runs on the already
    /// diagram-stripped text.
    pub fn extract(&self, reply: &str) -> Artifact {
        let (diagram, working) = take_first(&self.diagram, reply);
        let (code, working) = take_first(&self.code, &working);

        Artifact {
            diagram,
            code,
            text: working.trim().to_string(),
        }
    }
}

/// Captures the body of the first match and removes the whole block.
fn take_first(fence: &Regex, text: &str) -> (Option<String>, String) {
    let Some(caps) = fence.captures(text) else {
        return (None, text.to_string());
    };
    let (Some(block), Some(body)) = (caps.get(0), caps.get(1)) else {
        return (None, text.to_string());
    };

    let mut remaining = String::with_capacity(text.len() - block.len());
    remaining.push_str(&text[..block.start()]);
    remaining.push_str(&text[block.end()..]);
    (Some(body.as_str().to_string()), remaining)
}
