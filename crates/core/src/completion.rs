//! Completion evaluation for a quiz session.
//!
//! Pure functions over the progress sets and catalog: the session is
//! complete exactly when every catalog question has been answered correctly
//! at least once. Also hosts the defensive pool/progress desync check.

use crate::model::{Catalog, ProgressSets, QuestionId};
use crate::session::SessionError;

/// Where a session stands after the latest state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Questions remain in the working pool.
    InProgress { remaining: usize },
    /// Every catalog question is in the correct set.
    Complete,
}

/// True when every catalog question has been answered correctly.
#[must_use]
pub fn is_complete(progress: &ProgressSets, catalog: &Catalog) -> bool {
    progress.correct_count() == catalog.len()
}

/// Classify the session against a freshly derived working pool.
///
/// # Errors
///
/// Returns `SessionError::InconsistentState` when the pool is empty but not
/// every question is correct. That combination cannot arise from normal
/// operation (the pool is always derived as catalog minus correct), so it
/// signals a progress/catalog desync worth halting on rather than papering
/// over.
pub fn evaluate(
    pool: &[QuestionId],
    progress: &ProgressSets,
    catalog: &Catalog,
) -> Result<CompletionStatus, SessionError> {
    if pool.is_empty() {
        if is_complete(progress, catalog) {
            Ok(CompletionStatus::Complete)
        } else {
            Err(SessionError::InconsistentState {
                correct: progress.correct_count(),
                total: catalog.len(),
            })
        }
    } else {
        Ok(CompletionStatus::InProgress {
            remaining: pool.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProgressSnapshot, Question};

    fn build_catalog() -> Catalog {
        Catalog::new(vec![
            Question::new(QuestionId::new(1), "Q1", vec!["A".into()], "A").unwrap(),
            Question::new(QuestionId::new(2), "Q2", vec!["B".into()], "B").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn all_correct_is_complete() {
        let catalog = build_catalog();
        let snapshot = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(1), QuestionId::new(2)],
            incorrect_ids: Vec::new(),
        };
        let progress = ProgressSets::from_snapshot(&snapshot, &catalog);

        assert!(is_complete(&progress, &catalog));
        assert_eq!(
            evaluate(&[], &progress, &catalog).unwrap(),
            CompletionStatus::Complete
        );
    }

    #[test]
    fn remaining_questions_report_in_progress() {
        let catalog = build_catalog();
        let progress = ProgressSets::default();
        let pool = vec![QuestionId::new(1), QuestionId::new(2)];

        assert_eq!(
            evaluate(&pool, &progress, &catalog).unwrap(),
            CompletionStatus::InProgress { remaining: 2 }
        );
    }

    #[test]
    fn empty_pool_without_full_correct_set_is_inconsistent() {
        let catalog = build_catalog();
        let snapshot = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(1)],
            incorrect_ids: Vec::new(),
        };
        let progress = ProgressSets::from_snapshot(&snapshot, &catalog);

        let err = evaluate(&[], &progress, &catalog).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InconsistentState {
                correct: 1,
                total: 2
            }
        ));
    }
}
