//! Conversation turn orchestration.
//!
//! One turn appends the user's message, asks the completion service for a
//! reply, records the reply (or a fixed apology on failure), merges any
//! extracted artifact and saves the project exactly once.

use crate::persisted::Persisted;
use crate::project::{TurnGuard, TurnPermit};
use ryan_core::clock::{Clock, SystemClock};
use ryan_core::completion::{ChatTurn, CompletionError, CompletionRequest, CompletionService};
use ryan_core::config::DEFAULT_TIMEOUT_SECS;
use ryan_core::error::{Result, RyanError};
use ryan_core::extractor::ArtifactExtractor;
use ryan_core::ids::{IdGenerator, UuidIdGenerator};
use ryan_core::project::{Message, MessageRole, Project, ProjectRepository};
use ryan_core::prompt::PromptRegistry;
use ryan_core::SystemKind;
use std::sync::Arc;
use std::time::Duration;

/// Assistant message recorded when the completion service fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

pub struct ConversationOrchestrator {
    repository: Arc<dyn ProjectRepository>,
    completion: Arc<dyn CompletionService>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    prompts: PromptRegistry,
    extractor: ArtifactExtractor,
    timeout: Option<Duration>,
    turns: TurnGuard,
}

impl ConversationOrchestrator {
    /// Creates an orchestrator with UUID ids, the system clock, built-in
    /// prompts and the default timeout.
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            repository,
            completion,
            ids: Arc::new(UuidIdGenerator),
            clock: Arc::new(SystemClock),
            prompts: PromptRegistry::new(),
            extractor: ArtifactExtractor::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            turns: TurnGuard::new(),
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptRegistry) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_extractor(mut self, extractor: ArtifactExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// `None` waits for the completion service indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn repository(&self) -> &Arc<dyn ProjectRepository> {
        &self.repository
    }

    pub(crate) fn ids(&self) -> &Arc<dyn IdGenerator> {
        &self.ids
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Holds `project_id` for an edit made outside a turn. Fails with
    /// `TurnInProgress` while a turn or another edit holds it.
    pub(crate) fn reserve(&self, project_id: &str) -> Result<TurnPermit> {
        self.turns.acquire(project_id)
    }

    /// Runs one conversational turn for `system`.
    ///
    /// Completion failures are absorbed into a fallback assistant message.
    /// Errors are returned only for blank input or a turn already in flight
    /// for the same project; a failed save is reported in the result.
    pub async fn submit_turn(
        &self,
        mut project: Project,
        system: SystemKind,
        user_text: &str,
    ) -> Result<Persisted<Project>> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(RyanError::invalid_input("message text must not be empty"));
        }
        let _permit = self.turns.acquire(&project.id)?;

        let user_message = Message::new(self.ids.next_id(), MessageRole::User, text, self.clock.now());
        project.append_message(system, user_message);

        let request = CompletionRequest::new(
            project.history(system).iter().map(ChatTurn::from).collect(),
            Some(self.prompts.get_prompt(system).to_string()),
        );
        tracing::debug!(
            "Turn for project {} ({}): sending {} messages to {}",
            project.id,
            system,
            request.messages.len(),
            self.completion.name()
        );

        match self.request_completion(request).await {
            Ok(reply) => {
                let artifact = self.extractor.extract(&reply);
                let assistant = Message::new(self.ids.next_id(), MessageRole::Assistant, reply, self.clock.now());
                project.append_message(system, assistant);
                if project.merge_artifact(system, artifact) {
                    tracing::debug!("Merged artifact for project {} ({})", project.id, system);
                }
            }
            Err(e) => {
                let failure = RyanError::from(e);
                tracing::warn!("Completion failed for project {} ({}): {}", project.id, system, failure);
                let fallback = Message::new(
                    self.ids.next_id(),
                    MessageRole::Assistant,
                    FALLBACK_REPLY,
                    self.clock.now(),
                );
                project.append_message(system, fallback);
            }
        }

        project.touch(self.clock.now());
        Ok(self.persist(project).await)
    }

    /// Makes `system` the project's current system. Message logs and
    /// artifacts are left untouched.
    pub async fn switch_system(
        &self,
        mut project: Project,
        system: SystemKind,
    ) -> Result<Persisted<Project>> {
        let _permit = self.turns.acquire(&project.id)?;

        project.current_system = system;
        project.touch(self.clock.now());
        tracing::info!("Project {} switched to {}", project.id, system);
        Ok(self.persist(project).await)
    }

    async fn request_completion(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<String, CompletionError> {
        let call = self.completion.complete(request);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| CompletionError::Timeout(limit))?,
            None => call.await,
        }
    }

    pub(crate) async fn persist(&self, project: Project) -> Persisted<Project> {
        match self.repository.save(&project).await {
            Ok(()) => Persisted::saved(project),
            Err(e) => {
                tracing::warn!("Failed to save project {}: {}", project.id, e);
                Persisted::unsaved(project, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingRepository, GatedCompletion, ScriptedCompletion, StalledCompletion};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use ryan_core::clock::FixedClock;
    use ryan_core::ids::SequentialIdGenerator;
    use ryan_core::project::Artifact;

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn orchestrator(
        repository: Arc<CountingRepository>,
        completion: Arc<dyn CompletionService>,
    ) -> ConversationOrchestrator {
        ConversationOrchestrator::new(repository, completion)
            .with_ids(Arc::new(SequentialIdGenerator::new("m")))
            .with_clock(Arc::new(FixedClock::new(t0())))
    }

    fn project() -> Project {
        Project::new("p1", "Todo", "", t0())
    }

    #[tokio::test]
    async fn test_turn_appends_user_then_assistant_and_saves_once() {
        let repo = Arc::new(CountingRepository::new());
        let completion = Arc::new(ScriptedCompletion::replying("What platform?"));
        let orch = orchestrator(repo.clone(), completion.clone());

        let result = orch
            .submit_turn(project(), SystemKind::Analyzer, "  I want a todo app ")
            .await
            .unwrap();

        assert!(result.is_saved());
        assert_eq!(repo.save_count(), 1);

        let log = result.value.history(SystemKind::Analyzer);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, MessageRole::User);
        assert_eq!(log[0].content, "I want a todo app");
        assert_eq!(log[1].role, MessageRole::Assistant);
        assert_eq!(log[1].content, "What platform?");
        assert_ne!(log[0].id, log[1].id);
        assert!(result.value.history(SystemKind::Planner).is_empty());

        let requests = completion.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, vec![ChatTurn::user("I want a todo app")]);
        assert_eq!(
            requests[0].system_prompt.as_deref(),
            Some(ryan_core::prompt::builtin_prompt(SystemKind::Analyzer))
        );
    }

    #[tokio::test]
    async fn test_repeated_turns_alternate_and_send_full_history() {
        let repo = Arc::new(CountingRepository::new());
        let completion = Arc::new(ScriptedCompletion::new(vec![
            Ok("a1".to_string()),
            Err(CompletionError::Transport("reset".to_string())),
            Ok("a3".to_string()),
        ]));
        let orch = orchestrator(repo.clone(), completion.clone());

        let mut current = project();
        for text in ["u1", "u2", "u3"] {
            current = orch
                .submit_turn(current, SystemKind::Planner, text)
                .await
                .unwrap()
                .into_inner();
        }

        let log = current.history(SystemKind::Planner);
        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["u1", "a1", "u2", FALLBACK_REPLY, "u3", "a3"]);
        for (index, message) in log.iter().enumerate() {
            assert_eq!(message.is_user(), index % 2 == 0);
        }

        let last = completion.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 5);
        assert_eq!(last.messages.last(), Some(&ChatTurn::user("u3")));
        assert_eq!(repo.save_count(), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_yields_one_fallback_message() {
        let repo = Arc::new(CountingRepository::new());
        let completion = Arc::new(ScriptedCompletion::new(vec![Err(CompletionError::Transport(
            "connection refused".to_string(),
        ))]));
        let orch = orchestrator(repo.clone(), completion);

        let result = orch
            .submit_turn(project(), SystemKind::Analyzer, "hello")
            .await
            .unwrap();

        let log = result.value.history(SystemKind::Analyzer);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].content, "hello");
        assert_eq!(log[1].role, MessageRole::Assistant);
        assert_eq!(log[1].content, FALLBACK_REPLY);
        assert!(result.value.data.is_empty());
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_treated_as_failure() {
        let repo = Arc::new(CountingRepository::new());
        let orch = orchestrator(repo.clone(), Arc::new(StalledCompletion))
            .with_timeout(Some(Duration::from_millis(20)));

        let result = orch
            .submit_turn(project(), SystemKind::Developer, "build it")
            .await
            .unwrap();

        let log = result.value.history(SystemKind::Developer);
        assert_eq!(log.last().map(|m| m.content.as_str()), Some(FALLBACK_REPLY));
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn test_reply_artifact_is_merged_field_wise() {
        let repo = Arc::new(CountingRepository::new());
        let completion = Arc::new(ScriptedCompletion::replying(
            "Here is a plan.\n```mermaid\nmindmap\n  root\n```\nDone.",
        ));
        let orch = orchestrator(repo, completion);

        let mut existing = project();
        existing.data.insert(
            SystemKind::Analyzer,
            Artifact {
                diagram: None,
                code: Some("x".to_string()),
                text: "old".to_string(),
            },
        );

        let result = orch
            .submit_turn(existing, SystemKind::Analyzer, "plan it")
            .await
            .unwrap();

        let artifact = result.value.artifact(SystemKind::Analyzer).unwrap();
        assert_eq!(artifact.code.as_deref(), Some("x"));
        assert_eq!(artifact.diagram.as_deref(), Some("mindmap\n  root"));
        assert_eq!(artifact.text, "Here is a plan.\n\nDone.");

        // The conversation keeps the full reply.
        let log = result.value.history(SystemKind::Analyzer);
        assert!(log[1].content.contains("```mermaid"));
    }

    #[tokio::test]
    async fn test_plain_reply_leaves_data_untouched() {
        let repo = Arc::new(CountingRepository::new());
        let orch = orchestrator(repo, Arc::new(ScriptedCompletion::replying("Just text")));

        let result = orch
            .submit_turn(project(), SystemKind::Wireframe, "hi")
            .await
            .unwrap();

        assert!(result.value.artifact(SystemKind::Wireframe).is_none());
    }

    #[tokio::test]
    async fn test_save_failure_is_reported_without_losing_the_turn() {
        let repo = Arc::new(CountingRepository::new());
        repo.set_fail_saves(true);
        let orch = orchestrator(repo.clone(), Arc::new(ScriptedCompletion::replying("ok")));

        let result = orch
            .submit_turn(project(), SystemKind::Analyzer, "hi")
            .await
            .unwrap();

        assert!(!result.is_saved());
        assert!(result.storage_error.as_ref().is_some_and(RyanError::is_storage_unavailable));
        assert_eq!(result.value.history(SystemKind::Analyzer).len(), 2);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_before_any_change() {
        let repo = Arc::new(CountingRepository::new());
        let completion = Arc::new(ScriptedCompletion::replying("unused"));
        let orch = orchestrator(repo.clone(), completion.clone());

        let err = orch
            .submit_turn(project(), SystemKind::Analyzer, "  \n")
            .await
            .unwrap_err();

        assert!(matches!(err, RyanError::InvalidInput(_)));
        assert_eq!(repo.save_count(), 0);
        assert!(completion.requests().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_turn_for_same_project_is_rejected() {
        let repo = Arc::new(CountingRepository::new());
        let gate = Arc::new(GatedCompletion::default());
        let orch = Arc::new(orchestrator(repo.clone(), gate.clone()));

        let first = {
            let orch = orch.clone();
            tokio::spawn(async move { orch.submit_turn(project(), SystemKind::Analyzer, "one").await })
        };
        gate.entered.notified().await;

        let err = orch
            .submit_turn(project(), SystemKind::Planner, "two")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RyanError::TurnInProgress {
                project_id: "p1".to_string()
            }
        );

        let other = Project::new("p2", "Other", "", t0());
        let other_result = orch.switch_system(other, SystemKind::Developer).await.unwrap();
        assert_eq!(other_result.value.current_system, SystemKind::Developer);

        gate.release.notify_one();
        let finished = first.await.unwrap().unwrap();
        assert_eq!(finished.value.history(SystemKind::Analyzer).len(), 2);

        let again = orch.switch_system(finished.value, SystemKind::Planner).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_switch_system_only_changes_current_system_and_timestamp() {
        let repo = Arc::new(CountingRepository::new());
        let clock = Arc::new(FixedClock::new(t0()));
        let orch = ConversationOrchestrator::new(repo.clone(), Arc::new(ScriptedCompletion::replying("r")))
            .with_ids(Arc::new(SequentialIdGenerator::new("m")))
            .with_clock(clock.clone());

        let before = orch
            .submit_turn(project(), SystemKind::Analyzer, "hi")
            .await
            .unwrap()
            .into_inner();
        clock.advance(ChronoDuration::seconds(30));

        let after = orch
            .switch_system(before.clone(), SystemKind::Wireframe)
            .await
            .unwrap()
            .into_inner();

        assert_eq!(after.current_system, SystemKind::Wireframe);
        assert_eq!(after.messages, before.messages);
        assert_eq!(after.data, before.data);
        assert_eq!(after.updated_at, t0() + ChronoDuration::seconds(30));
        assert_eq!(repo.save_count(), 2);
    }
}
