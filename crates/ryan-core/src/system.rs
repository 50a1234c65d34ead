//! Conversational system kinds.
//!
//! A project is worked on by four specialized systems, each keeping its own
//! message log and artifact slot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of conversational systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    /// Project Analyzer (PAS): breaks the project down into sub-systems.
    Analyzer,
    /// Project Planner (PPS): phases, MVPs, user stories.
    Planner,
    /// Wireframe Designer (WDS): HTML wireframes.
    Wireframe,
    /// Developer (DVS): implementation code and tests.
    Developer,
}

impl SystemKind {
    /// Number of systems.
    pub const COUNT: usize = 4;

    /// All systems in display order.
    pub const ALL: [SystemKind; Self::COUNT] = [
        SystemKind::Analyzer,
        SystemKind::Planner,
        SystemKind::Wireframe,
        SystemKind::Developer,
    ];

    /// Lowercase identifier used on disk and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemKind::Analyzer => "analyzer",
            SystemKind::Planner => "planner",
            SystemKind::Wireframe => "wireframe",
            SystemKind::Developer => "developer",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SystemKind::Analyzer => "Project Analyzer",
            SystemKind::Planner => "Project Planner",
            SystemKind::Wireframe => "Wireframe Designer",
            SystemKind::Developer => "Developer",
        }
    }

    /// Three-letter component code.
    pub fn code(&self) -> &'static str {
        match self {
            SystemKind::Analyzer => "PAS",
            SystemKind::Planner => "PPS",
            SystemKind::Wireframe => "WDS",
            SystemKind::Developer => "DVS",
        }
    }
}

impl Default for SystemKind {
    fn default() -> Self {
        SystemKind::Analyzer
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown system '{0}' (expected analyzer, planner, wireframe or developer)")]
pub struct UnknownSystem(pub String);

impl FromStr for SystemKind {
    type Err = UnknownSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        SystemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == needle || kind.code().to_lowercase() == needle)
            .ok_or_else(|| UnknownSystem(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!("planner".parse::<SystemKind>().unwrap(), SystemKind::Planner);
        assert_eq!(" Wireframe ".parse::<SystemKind>().unwrap(), SystemKind::Wireframe);
        assert_eq!("dvs".parse::<SystemKind>().unwrap(), SystemKind::Developer);
        assert!("designer".parse::<SystemKind>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&SystemKind::Analyzer).unwrap();
        assert_eq!(json, "\"analyzer\"");
        let back: SystemKind = serde_json::from_str("\"developer\"").unwrap();
        assert_eq!(back, SystemKind::Developer);
    }

    #[test]
    fn test_default_is_analyzer() {
        assert_eq!(SystemKind::default(), SystemKind::Analyzer);
    }
}
