//! Shared error types for the services crate.

use thiserror::Error;

use backend::BackendError;
use quiz_core::model::CatalogError;

/// Errors raised while bringing a session up.
///
/// Only the catalog side is fatal here: a failed progress fetch degrades to
/// an empty snapshot inside `QuizLoopService` and never surfaces as an
/// error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoadError {
    #[error("failed to load question catalog")]
    Catalog(#[source] BackendError),

    #[error(transparent)]
    InvalidCatalog(#[from] CatalogError),
}
