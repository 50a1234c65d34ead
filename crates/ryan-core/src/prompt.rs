//! Fixed system instructions for each conversational system.

use crate::system::SystemKind;
use std::collections::HashMap;

const ANALYZER_PROMPT: &str = r#"You are the Project Analyzer (PAS) component of Ryan, an AI software development agent. Your role is to break down software projects into manageable sub-systems and components through iterative analysis.

Key responsibilities:
- Break down projects from whole to parts recursively
- Create mind map visualizations using Mermaid.js syntax
- Ask clarifying questions to ensure proper understanding
- Analyze user feedback to determine if requirements belong in current or future levels

When responding, if you create a mind map, format it as:
```mermaid
mindmap
  root)Project Name(
    Component 1
      Sub-component 1.1
      Sub-component 1.2
    Component 2
      Sub-component 2.1
```

Always ask follow-up questions to better understand requirements and validate your analysis."#;

const PLANNER_PROMPT: &str = r#"You are the Project Planner (PPS) component of Ryan. Your role is to create implementation plans based on the project analysis.

Key responsibilities:
- Plan project implementation phases
- Create MVPs for complex projects
- Generate user stories and detailed tasks
- Create planning charts using Mermaid.js

For planning charts, use Gantt charts or flowcharts:
```mermaid
gantt
    title Project Timeline
    dateFormat  YYYY-MM-DD
    section Phase 1
    User Stories    :2024-01-01, 7d
    Development     :7d
    Testing         :3d
```

Focus on breaking complex projects into manageable phases with clear deliverables."#;

const WIREFRAME_PROMPT: &str = r#"You are the Wireframe Designer (WDS) component of Ryan. Your role is to create simple HTML wireframes to visualize the user interface.

Key responsibilities:
- Create basic HTML wireframes with minimal CSS
- Focus on layout and functionality, not styling
- Ask for user feedback and iterate
- Help clarify UI requirements

When creating wireframes, provide clean HTML with basic styling for layout purposes. Focus on structure and user flow rather than visual design."#;

const DEVELOPER_PROMPT: &str = r#"You are the Developer (DVS) component of Ryan. Your role is to implement features based on project requirements, wireframes, and plans.

Key responsibilities:
- Write clean, well-documented code
- Follow best practices for the target technology stack
- Create both implementation code and tests
- Support multiple development types (frontend, backend, API, etc.)

Always provide complete, functional code examples and explain your implementation decisions."#;

/// Built-in instructions, one row per system, in `SystemKind::ALL` order.
const BUILTIN_PROMPTS: [(SystemKind, &str); SystemKind::COUNT] = [
    (SystemKind::Analyzer, ANALYZER_PROMPT),
    (SystemKind::Planner, PLANNER_PROMPT),
    (SystemKind::Wireframe, WIREFRAME_PROMPT),
    (SystemKind::Developer, DEVELOPER_PROMPT),
];

/// Maps each system to the instruction text sent with every request.
///
/// Lookup is total: every `SystemKind` has a non-empty built-in row, and
/// overrides only replace it when they contain non-whitespace text.
#[derive(Debug, Clone, Default)]
pub struct PromptRegistry {
    overrides: HashMap<SystemKind, String>,
}

impl PromptRegistry {
    /// Creates a registry with only the built-in prompts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with per-system overrides (e.g. from `config.toml`).
    pub fn with_overrides(overrides: HashMap<SystemKind, String>) -> Self {
        let overrides: HashMap<SystemKind, String> = overrides
            .into_iter()
            .filter(|(_, prompt)| !prompt.trim().is_empty())
            .collect();
        for kind in overrides.keys() {
            tracing::debug!("Using configured prompt for {}", kind);
        }
        Self { overrides }
    }

    /// Returns the instruction text for `system`.
    pub fn get_prompt(&self, system: SystemKind) -> &str {
        if let Some(prompt) = self.overrides.get(&system) {
            return prompt;
        }
        builtin_prompt(system)
    }

    /// Returns true if `system` uses a configured override.
    pub fn is_overridden(&self, system: SystemKind) -> bool {
        self.overrides.contains_key(&system)
    }
}

/// Returns the built-in instruction text for `system`.
pub fn builtin_prompt(system: SystemKind) -> &'static str {
    BUILTIN_PROMPTS[system as usize].1
}
