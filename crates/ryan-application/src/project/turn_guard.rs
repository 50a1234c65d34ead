//! Per-project in-flight guard.

use ryan_core::error::{Result, RyanError};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tracks which projects have a turn in flight.
///
/// `acquire` fails fast with `TurnInProgress` instead of queueing.
#[derive(Debug, Clone, Default)]
pub struct TurnGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl TurnGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn in_flight(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked.
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `project_id` busy until the returned permit is dropped.
    pub fn acquire(&self, project_id: &str) -> Result<TurnPermit> {
        if !self.in_flight().insert(project_id.to_string()) {
            return Err(RyanError::TurnInProgress {
                project_id: project_id.to_string(),
            });
        }
        Ok(TurnPermit {
            guard: self.clone(),
            project_id: project_id.to_string(),
        })
    }

    pub fn is_busy(&self, project_id: &str) -> bool {
        self.in_flight().contains(project_id)
    }
}

#[derive(Debug)]
pub struct TurnPermit {
    guard: TurnGuard,
    project_id: String,
}

impl Drop for TurnPermit {
    fn drop(&mut self) {
        self.guard.in_flight().remove(&self.project_id);
    }
}
