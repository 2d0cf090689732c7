use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::completion::{self, CompletionStatus};
use crate::model::{Catalog, ProgressSets, ProgressSnapshot, Question, QuestionId};
use crate::select::Picker;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised by session state transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// The working pool is empty but not every catalog question is correct.
    /// Defensive check: indicates progress/catalog desync, halts selection.
    #[error("question pool is empty but only {correct} of {total} questions are correct")]
    InconsistentState { correct: usize, total: usize },

    /// An outcome was applied for an id the catalog does not contain.
    /// This is a programming error in the caller, not a user-reachable state.
    #[error("question {0} is not part of the catalog")]
    UnknownQuestion(QuestionId),
}

//
// ─── SELECTION & OUTCOME ───────────────────────────────────────────────────────
//

/// Result of asking the session for the next question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextQuestion {
    /// A question picked uniformly at random from the working pool.
    Ask(Question),
    /// Every catalog question has been answered correctly.
    Complete,
}

/// Result of applying a selected option to a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub is_correct: bool,
    /// The question's true answer, for rendering feedback.
    pub correct_answer: String,
    /// Completion state immediately after this outcome was applied.
    pub is_complete: bool,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// One continuous quiz run, from initialization (or restart) to completion.
///
/// Owns the catalog snapshot, the correct/incorrect progress sets, the
/// session-local wrong-answer counter and the current-question pointer. All
/// mutation goes through [`SessionState::apply_outcome`] and
/// [`SessionState::restart`]; the working pool is recomputed from the correct
/// set on every selection rather than patched incrementally, so it can never
/// drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    catalog: Catalog,
    progress: ProgressSets,
    incorrect_attempts: u32,
    current: Option<QuestionId>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Initialize a session from a loaded catalog and a server progress
    /// snapshot. Snapshot ids absent from the catalog are ignored.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic in tests.
    #[must_use]
    pub fn start(
        catalog: Catalog,
        snapshot: &ProgressSnapshot,
        started_at: DateTime<Utc>,
    ) -> Self {
        let progress = ProgressSets::from_snapshot(snapshot, &catalog);
        let completed_at = completion::is_complete(&progress, &catalog).then_some(started_at);
        Self {
            catalog,
            progress,
            incorrect_attempts: 0,
            current: None,
            started_at,
            completed_at,
        }
    }

    /// Discard local progress and rebuild from a fresh snapshot.
    ///
    /// Re-entrant by design: the catalog is reused, the correct/incorrect
    /// sets and the session counter are rebuilt from scratch.
    pub fn restart(&mut self, snapshot: &ProgressSnapshot, restarted_at: DateTime<Utc>) {
        self.progress = ProgressSets::from_snapshot(snapshot, &self.catalog);
        self.incorrect_attempts = 0;
        self.current = None;
        self.started_at = restarted_at;
        self.completed_at =
            completion::is_complete(&self.progress, &self.catalog).then_some(restarted_at);
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressSets {
        &self.progress
    }

    /// Wrong submissions made during this session, counting repeats on the
    /// same question. Resets to zero only on start/restart.
    #[must_use]
    pub fn incorrect_attempts(&self) -> u32 {
        self.incorrect_attempts
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|id| self.catalog.get(id))
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        completion::is_complete(&self.progress, &self.catalog)
    }

    /// Questions still eligible to be asked: catalog ids minus the correct
    /// set. Recomputed on every call, never stored.
    #[must_use]
    pub fn working_pool(&self) -> Vec<QuestionId> {
        self.catalog
            .ids()
            .filter(|id| !self.progress.is_correct(*id))
            .collect()
    }

    /// Pick the next question uniformly at random from the working pool.
    ///
    /// Selection only moves the current-question pointer; the pool itself is
    /// mutated exclusively by [`SessionState::apply_outcome`]. The pool is
    /// re-derived here so questions answered correctly moments ago are
    /// already excluded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InconsistentState`, without mutating anything,
    /// if the pool is empty while some questions are still not correct.
    pub fn select_next(&mut self, picker: &mut dyn Picker) -> Result<NextQuestion, SessionError> {
        let pool = self.working_pool();
        match completion::evaluate(&pool, &self.progress, &self.catalog)? {
            CompletionStatus::Complete => {
                self.current = None;
                Ok(NextQuestion::Complete)
            }
            CompletionStatus::InProgress { .. } => {
                let id = pool[picker.pick(pool.len())];
                self.current = Some(id);
                let question = self
                    .catalog
                    .get(id)
                    .cloned()
                    .ok_or(SessionError::UnknownQuestion(id))?;
                Ok(NextQuestion::Ask(question))
            }
        }
    }

    /// Apply the user's selected option to a question and update the
    /// progress sets atomically.
    ///
    /// Correct: the id enters `correct` and leaves `incorrect`; the next
    /// pool derivation excludes it permanently for this session. Incorrect:
    /// the session counter increments and the id enters `incorrect` (no
    /// duplicates); the question stays eligible for future selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the id is not in the
    /// catalog.
    pub fn apply_outcome(
        &mut self,
        question_id: QuestionId,
        selected_option: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .catalog
            .get(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        let is_correct = question.is_correct(selected_option);
        let correct_answer = question.answer().to_owned();

        if is_correct {
            self.progress.mark_correct(question_id);
        } else {
            self.incorrect_attempts += 1;
            self.progress.mark_incorrect(question_id);
        }
        self.current = None;

        let is_complete = self.is_complete();
        if is_complete && self.completed_at.is_none() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            question_id,
            is_correct,
            correct_answer,
            is_complete,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::SequencePicker;
    use crate::time::fixed_now;

    fn two_question_catalog() -> Catalog {
        Catalog::new(vec![
            Question::new(
                QuestionId::new(1),
                "Q1",
                vec!["A".into(), "B".into()],
                "A",
            )
            .unwrap(),
            Question::new(
                QuestionId::new(2),
                "Q2",
                vec!["C".into(), "D".into()],
                "C",
            )
            .unwrap(),
        ])
        .unwrap()
    }

    fn fresh_session() -> SessionState {
        SessionState::start(two_question_catalog(), &ProgressSnapshot::empty(), fixed_now())
    }

    #[test]
    fn pool_starts_as_whole_catalog() {
        let session = fresh_session();
        assert_eq!(
            session.working_pool(),
            vec![QuestionId::new(1), QuestionId::new(2)]
        );
        assert!(!session.is_complete());
    }

    #[test]
    fn selection_does_not_mutate_the_pool() {
        let mut session = fresh_session();
        let mut picker = SequencePicker::new(vec![0]);
        let next = session.select_next(&mut picker).unwrap();

        assert!(matches!(next, NextQuestion::Ask(ref q) if q.id() == QuestionId::new(1)));
        assert_eq!(session.current_question().unwrap().id(), QuestionId::new(1));
        assert_eq!(session.working_pool().len(), 2);
    }

    #[test]
    fn wrong_answer_keeps_question_in_pool_and_counts_attempt() {
        let mut session = fresh_session();

        let outcome = session
            .apply_outcome(QuestionId::new(1), "B", fixed_now())
            .unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.correct_answer, "A");
        assert!(!outcome.is_complete);

        assert_eq!(session.incorrect_attempts(), 1);
        assert_eq!(session.progress().incorrect_count(), 1);
        assert_eq!(session.working_pool().len(), 2);
    }

    #[test]
    fn correcting_a_wrong_answer_shrinks_the_pool() {
        let mut session = fresh_session();
        session
            .apply_outcome(QuestionId::new(1), "B", fixed_now())
            .unwrap();
        let outcome = session
            .apply_outcome(QuestionId::new(1), "A", fixed_now())
            .unwrap();

        assert!(outcome.is_correct);
        assert!(session.progress().is_correct(QuestionId::new(1)));
        assert_eq!(session.progress().incorrect_count(), 0);
        assert_eq!(session.working_pool(), vec![QuestionId::new(2)]);
        // the counter keeps the earlier wrong attempt
        assert_eq!(session.incorrect_attempts(), 1);
    }

    #[test]
    fn full_scenario_reaches_completion_with_one_wrong_attempt() {
        let mut session = fresh_session();
        let mut picker = SequencePicker::new(vec![0, 0, 0]);

        assert!(matches!(
            session.select_next(&mut picker).unwrap(),
            NextQuestion::Ask(_)
        ));

        session
            .apply_outcome(QuestionId::new(1), "B", fixed_now())
            .unwrap();
        session
            .apply_outcome(QuestionId::new(1), "A", fixed_now())
            .unwrap();
        let last = session
            .apply_outcome(QuestionId::new(2), "C", fixed_now())
            .unwrap();

        assert!(last.is_complete);
        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.incorrect_attempts(), 1);
        assert!(session.working_pool().is_empty());
        assert!(matches!(
            session.select_next(&mut picker).unwrap(),
            NextQuestion::Complete
        ));
    }

    #[test]
    fn preloaded_progress_narrows_the_initial_pool() {
        let snapshot = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(1)],
            incorrect_ids: vec![QuestionId::new(2)],
        };
        let mut session = SessionState::start(two_question_catalog(), &snapshot, fixed_now());

        assert_eq!(session.working_pool(), vec![QuestionId::new(2)]);
        let mut picker = SequencePicker::new(vec![0]);
        let next = session.select_next(&mut picker).unwrap();
        assert!(matches!(next, NextQuestion::Ask(ref q) if q.id() == QuestionId::new(2)));
    }

    #[test]
    fn stale_snapshot_ids_are_ignored() {
        let snapshot = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(77)],
            incorrect_ids: vec![QuestionId::new(88)],
        };
        let session = SessionState::start(two_question_catalog(), &snapshot, fixed_now());

        assert_eq!(session.progress().correct_count(), 0);
        assert_eq!(session.progress().incorrect_count(), 0);
        assert_eq!(session.working_pool().len(), 2);
    }

    #[test]
    fn unknown_question_id_is_a_caller_error() {
        let mut session = fresh_session();
        let err = session
            .apply_outcome(QuestionId::new(99), "A", fixed_now())
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(id) if id == QuestionId::new(99)));
        // nothing was recorded for the bogus id
        assert_eq!(session.incorrect_attempts(), 0);
        assert_eq!(session.progress().incorrect_count(), 0);
    }

    #[test]
    fn restart_resets_counter_and_rebuilds_sets() {
        let mut session = fresh_session();
        for _ in 0..3 {
            session
                .apply_outcome(QuestionId::new(1), "B", fixed_now())
                .unwrap();
        }
        assert_eq!(session.incorrect_attempts(), 3);

        let fresh = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(2)],
            incorrect_ids: Vec::new(),
        };
        session.restart(&fresh, fixed_now());

        assert_eq!(session.incorrect_attempts(), 0);
        assert!(session.current_question().is_none());
        assert_eq!(session.working_pool(), vec![QuestionId::new(1)]);
        assert_eq!(session.progress().incorrect_count(), 0);
    }

    #[test]
    fn session_started_already_complete_selects_complete() {
        let snapshot = ProgressSnapshot {
            correct_ids: vec![QuestionId::new(1), QuestionId::new(2)],
            incorrect_ids: Vec::new(),
        };
        let mut session = SessionState::start(two_question_catalog(), &snapshot, fixed_now());

        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        let mut picker = SequencePicker::new(Vec::new());
        assert!(matches!(
            session.select_next(&mut picker).unwrap(),
            NextQuestion::Complete
        ));
    }
}
