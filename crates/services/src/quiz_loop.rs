use std::sync::Arc;

use tracing::{info, warn};

use backend::Backend;
use quiz_core::model::{Catalog, ProgressSnapshot, QuestionId};
use quiz_core::session::{AnswerOutcome, SessionError, SessionState};
use quiz_core::time::Clock;

use crate::error::QuizLoadError;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub outcome: AnswerOutcome,
    /// Session-local wrong-answer count after this outcome, for the
    /// completion display.
    pub incorrect_attempts: u32,
}

/// Orchestrates session start, answering, and restart against the backend.
///
/// Loads catalog then progress sequentially before any selection happens.
/// Answer recording is fire-and-forget: the record request is dispatched and
/// the answer path returns immediately; local state is the source of truth
/// for the rest of the session.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    backend: Backend,
    username: String,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, backend: Backend, username: impl Into<String>) -> Self {
        Self {
            clock,
            backend,
            username: username.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch catalog and progress and build a fresh session.
    ///
    /// A progress fetch failure is recoverable: the session starts from an
    /// empty snapshot with a warning. A catalog failure is fatal.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoadError` if the catalog cannot be fetched or is empty
    /// or malformed.
    pub async fn start_session(&self) -> Result<SessionState, QuizLoadError> {
        let questions = self
            .backend
            .catalog
            .fetch_catalog()
            .await
            .map_err(QuizLoadError::Catalog)?;
        let catalog = Catalog::new(questions)?;
        let snapshot = self.load_progress_or_empty().await;

        let session = SessionState::start(catalog, &snapshot, self.clock.now());
        info!(
            user = %self.username,
            total = session.catalog().len(),
            remaining = session.working_pool().len(),
            "session started"
        );
        Ok(session)
    }

    /// Apply the user's selected option and dispatch the answer record.
    ///
    /// The dispatch never blocks or fails this call: a sink error is logged
    /// by the spawned task and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` for an id outside the
    /// catalog.
    pub fn answer(
        &self,
        session: &mut SessionState,
        question_id: QuestionId,
        selected_option: &str,
    ) -> Result<SessionAnswerResult, SessionError> {
        let outcome = session.apply_outcome(question_id, selected_option, self.clock.now())?;
        self.dispatch_record(question_id, outcome.is_correct);

        Ok(SessionAnswerResult {
            outcome,
            incorrect_attempts: session.incorrect_attempts(),
        })
    }

    /// Rebuild the session from a fresh progress fetch, reusing the catalog.
    pub async fn restart(&self, session: &mut SessionState) {
        let snapshot = self.load_progress_or_empty().await;
        session.restart(&snapshot, self.clock.now());
        info!(
            user = %self.username,
            remaining = session.working_pool().len(),
            "session restarted"
        );
    }

    async fn load_progress_or_empty(&self) -> ProgressSnapshot {
        match self
            .backend
            .progress
            .fetch_progress(&self.username)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(user = %self.username, error = %e, "progress load failed, starting fresh");
                ProgressSnapshot::empty()
            }
        }
    }

    fn dispatch_record(&self, question_id: QuestionId, is_correct: bool) {
        let sink = Arc::clone(&self.backend.answers);
        let username = self.username.clone();
        tokio::spawn(async move {
            if let Err(e) = sink.record_answer(&username, question_id, is_correct).await {
                warn!(%question_id, error = %e, "failed to record answer");
            }
        });
    }
}
