#![forbid(unsafe_code)]

pub mod completion;
pub mod error;
pub mod model;
pub mod select;
pub mod session;
pub mod time;

pub use completion::CompletionStatus;
pub use error::Error;
pub use model::{Catalog, CatalogError, ProgressSets, ProgressSnapshot, Question, QuestionId};
pub use select::{Picker, SequencePicker};
pub use session::{AnswerOutcome, NextQuestion, SessionError, SessionState};
pub use time::Clock;
