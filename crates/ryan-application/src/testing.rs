//! Test doubles shared by the unit tests in this crate.

use async_trait::async_trait;
use ryan_core::completion::{CompletionError, CompletionRequest, CompletionService};
use ryan_core::error::{Result, RyanError};
use ryan_core::project::{Project, ProjectRepository};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Replies from a script and records every request.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<std::result::Result<String, CompletionError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<std::result::Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("ok".to_string()))
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledCompletion;

#[async_trait]
impl CompletionService for StalledCompletion {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

/// Blocks inside `complete` until released.
#[derive(Default)]
pub struct GatedCompletion {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl CompletionService for GatedCompletion {
    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("released".to_string())
    }
}

/// In-memory repository that counts saves and can be told to fail them.
#[derive(Default)]
pub struct CountingRepository {
    projects: Mutex<BTreeMap<String, Project>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProjectRepository for CountingRepository {
    async fn save(&self, project: &Project) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RyanError::storage("quota exceeded"));
        }
        self.projects
            .lock()
            .unwrap()
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn list(&self) -> Vec<Project> {
        self.projects.lock().unwrap().values().cloned().collect()
    }

    async fn get(&self, id: &str) -> Option<Project> {
        self.projects.lock().unwrap().get(id).cloned()
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.projects.lock().unwrap().remove(id);
        Ok(())
    }
}
