use async_trait::async_trait;
use quiz_core::model::{ProgressSnapshot, Question, QuestionId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("request failed ({endpoint}): {reason}")]
    Request { endpoint: String, reason: String },

    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// A recorded (user, question, correctness) event as accepted by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub username: String,
    pub question_id: QuestionId,
    pub is_correct: bool,
}

//
// ─── SERVICE CONTRACTS ─────────────────────────────────────────────────────────
//

/// The question-catalog service: returns every question record.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch all question records.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the payload is
    /// malformed. An empty list is not an error at this layer; the core
    /// catalog validation rejects it.
    async fn fetch_catalog(&self) -> Result<Vec<Question>, BackendError>;
}

/// The progress service: per-user correct/incorrect id sets.
#[async_trait]
pub trait ProgressSource: Send + Sync {
    /// Fetch the stored progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or decode failure. Callers treat
    /// this as recoverable and degrade to an empty snapshot.
    async fn fetch_progress(&self, username: &str) -> Result<ProgressSnapshot, BackendError>;
}

/// The answer-recording sink. Fire-and-forget from the session's
/// perspective: failures are logged by the caller, never acted on.
#[async_trait]
pub trait AnswerSink: Send + Sync {
    /// Record one answer event.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the event could not be delivered.
    async fn record_answer(
        &self,
        username: &str,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), BackendError>;
}

/// Aggregates the three collaborators behind trait objects so the services
/// layer can swap the HTTP backend for the in-memory one in tests.
#[derive(Clone)]
pub struct Backend {
    pub catalog: Arc<dyn CatalogSource>,
    pub progress: Arc<dyn ProgressSource>,
    pub answers: Arc<dyn AnswerSink>,
}

impl Backend {
    #[must_use]
    pub fn from_memory(memory: InMemoryBackend) -> Self {
        let shared = Arc::new(memory);
        Self {
            catalog: Arc::clone(&shared) as Arc<dyn CatalogSource>,
            progress: Arc::clone(&shared) as Arc<dyn ProgressSource>,
            answers: shared as Arc<dyn AnswerSink>,
        }
    }
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// In-memory backend for tests and prototyping.
///
/// Failure switches let tests exercise the degraded paths (catalog load
/// failure, progress fallback, sink errors) without a network.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    questions: Vec<Question>,
    snapshot: ProgressSnapshot,
    recorded: Arc<Mutex<Vec<AnswerRecord>>>,
    fail_catalog: bool,
    fail_progress: bool,
    fail_record: bool,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_progress(mut self, snapshot: ProgressSnapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    #[must_use]
    pub fn with_failing_catalog(mut self) -> Self {
        self.fail_catalog = true;
        self
    }

    #[must_use]
    pub fn with_failing_progress(mut self) -> Self {
        self.fail_progress = true;
        self
    }

    #[must_use]
    pub fn with_failing_record(mut self) -> Self {
        self.fail_record = true;
        self
    }

    /// Answer events delivered so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn recorded_answers(&self) -> Vec<AnswerRecord> {
        self.recorded.lock().expect("record lock poisoned").clone()
    }

    fn failure(endpoint: &str) -> BackendError {
        BackendError::Request {
            endpoint: endpoint.to_owned(),
            reason: "simulated failure".to_owned(),
        }
    }
}

#[async_trait]
impl CatalogSource for InMemoryBackend {
    async fn fetch_catalog(&self) -> Result<Vec<Question>, BackendError> {
        if self.fail_catalog {
            return Err(Self::failure("/api/questions"));
        }
        Ok(self.questions.clone())
    }
}

#[async_trait]
impl ProgressSource for InMemoryBackend {
    async fn fetch_progress(&self, _username: &str) -> Result<ProgressSnapshot, BackendError> {
        if self.fail_progress {
            return Err(Self::failure("/api/progress"));
        }
        Ok(self.snapshot.clone())
    }
}

#[async_trait]
impl AnswerSink for InMemoryBackend {
    async fn record_answer(
        &self,
        username: &str,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), BackendError> {
        if self.fail_record {
            return Err(Self::failure("/api/answer"));
        }
        let mut guard = self
            .recorded
            .lock()
            .map_err(|e| BackendError::Request {
                endpoint: "/api/answer".to_owned(),
                reason: e.to_string(),
            })?;
        guard.push(AnswerRecord {
            username: username.to_owned(),
            question_id,
            is_correct,
        });
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
