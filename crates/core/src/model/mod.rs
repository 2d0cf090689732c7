mod ids;
mod progress;
mod question;

pub use ids::{ParseIdError, QuestionId};
pub use progress::{ProgressSets, ProgressSnapshot};
pub use question::{Catalog, CatalogError, Question, QuestionError};
