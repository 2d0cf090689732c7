use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised while validating a single question record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question {0} has an empty prompt")]
    EmptyPrompt(QuestionId),

    #[error("question {0} has no options")]
    NoOptions(QuestionId),

    #[error("question {0}: answer {answer:?} is not one of the options")]
    AnswerNotAnOption { id: QuestionId, answer: String },
}

/// Errors raised while assembling a catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog service returned no questions. Fatal: there is nothing to ask.
    #[error("catalog contains no questions")]
    Empty,

    #[error("catalog contains duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question as served by the catalog service.
///
/// Immutable once constructed; the session never mutates catalog records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, the option list is
    /// empty, or the answer does not match any option exactly.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt(id));
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions(id));
        }
        if !options.iter().any(|option| *option == answer) {
            return Err(QuestionError::AnswerNotAnOption { id, answer });
        }

        Ok(Self {
            id,
            prompt,
            options,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Exact string comparison against the stored answer.
    #[must_use]
    pub fn is_correct(&self, selected_option: &str) -> bool {
        self.answer == selected_option
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The full, static set of question records for a quiz.
///
/// Loaded once per session and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog from the ordered sequence served by the backend.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty sequence and
    /// `CatalogError::DuplicateId` if two records share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, question) in questions.iter().enumerate() {
            if questions[..index].iter().any(|q| q.id() == question.id()) {
                return Err(CatalogError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over catalog questions in served order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Iterate over catalog ids in served order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
