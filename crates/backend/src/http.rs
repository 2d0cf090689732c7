use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::{ProgressSnapshot, Question, QuestionId};

use crate::api::{AnswerSink, Backend, BackendError, CatalogSource, ProgressSource};

/// Connection settings for the quiz backend API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    /// Read the base URL from `QUIZ_API_BASE_URL`, falling back to the
    /// development server default.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("QUIZ_API_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.into());
        Self { base_url }
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

/// HTTP adapter for the three backend collaborators.
///
/// Routes: `GET /api/questions`, `GET /api/progress/<username>`,
/// `POST /api/answer`.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Wrap this adapter into the trait-object aggregate used by services.
    #[must_use]
    pub fn into_backend(self) -> Backend {
        let shared = Arc::new(self);
        Backend {
            catalog: Arc::clone(&shared) as Arc<dyn CatalogSource>,
            progress: Arc::clone(&shared) as Arc<dyn ProgressSource>,
            answers: shared as Arc<dyn AnswerSink>,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| BackendError::Request {
                endpoint: endpoint.to_owned(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| BackendError::Decode {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpBackend {
    async fn fetch_catalog(&self) -> Result<Vec<Question>, BackendError> {
        let records: Vec<QuestionRecord> = self.get_json("/api/questions").await?;
        records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendError::Decode {
                endpoint: "/api/questions".to_owned(),
                reason: e,
            })
    }
}

#[async_trait]
impl ProgressSource for HttpBackend {
    async fn fetch_progress(&self, username: &str) -> Result<ProgressSnapshot, BackendError> {
        self.get_json(&format!("/api/progress/{username}")).await
    }
}

#[async_trait]
impl AnswerSink for HttpBackend {
    async fn record_answer(
        &self,
        username: &str,
        question_id: QuestionId,
        is_correct: bool,
    ) -> Result<(), BackendError> {
        let endpoint = "/api/answer";
        let body = AnswerBody {
            username,
            question_id,
            is_correct,
        };

        let response = self
            .client
            .post(self.url(endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                endpoint: endpoint.to_owned(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    id: u64,
    question: String,
    options: Vec<String>,
    answer: String,
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, String> {
        Question::new(
            QuestionId::new(self.id),
            self.question,
            self.options,
            self.answer,
        )
        .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct AnswerBody<'a> {
    username: &'a str,
    question_id: QuestionId,
    is_correct: bool,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
