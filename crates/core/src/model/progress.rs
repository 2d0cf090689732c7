use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::QuestionId;
use crate::model::question::Catalog;

//
// ─── PROGRESS SNAPSHOT ─────────────────────────────────────────────────────────
//

/// Wire shape of the progress service response.
///
/// Either field may be absent in the payload; absence means empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub correct_ids: Vec<QuestionId>,
    #[serde(default)]
    pub incorrect_ids: Vec<QuestionId>,
}

impl ProgressSnapshot {
    /// Snapshot with no recorded progress, used when the progress fetch
    /// fails and the session degrades to a fresh start.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

//
// ─── PROGRESS SETS ─────────────────────────────────────────────────────────────
//

/// The per-user correctness bookkeeping for one session.
///
/// Invariant: `correct` and `incorrect` are disjoint at all times. A question
/// leaves `incorrect` the moment it is answered correctly, and membership in
/// `correct` is permanent for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSets {
    correct: BTreeSet<QuestionId>,
    incorrect: BTreeSet<QuestionId>,
}

impl ProgressSets {
    /// Seed progress from a server snapshot, filtered to ids present in the
    /// catalog. Stale ids (no longer in the catalog) are dropped silently.
    ///
    /// An id listed in both server sets counts as correct: once answered
    /// correctly, a question never sits in `incorrect`.
    #[must_use]
    pub fn from_snapshot(snapshot: &ProgressSnapshot, catalog: &Catalog) -> Self {
        let correct: BTreeSet<QuestionId> = snapshot
            .correct_ids
            .iter()
            .copied()
            .filter(|id| catalog.contains(*id))
            .collect();
        let incorrect = snapshot
            .incorrect_ids
            .iter()
            .copied()
            .filter(|id| catalog.contains(*id) && !correct.contains(id))
            .collect();

        Self { correct, incorrect }
    }

    #[must_use]
    pub fn correct(&self) -> &BTreeSet<QuestionId> {
        &self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> &BTreeSet<QuestionId> {
        &self.incorrect
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct.len()
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.incorrect.len()
    }

    #[must_use]
    pub fn is_correct(&self, id: QuestionId) -> bool {
        self.correct.contains(&id)
    }

    /// Record a correct answer: enters `correct`, leaves `incorrect`.
    ///
    /// Both updates happen before this call returns, so no caller can observe
    /// the id in both sets.
    pub fn mark_correct(&mut self, id: QuestionId) {
        self.correct.insert(id);
        self.incorrect.remove(&id);
    }

    /// Record an incorrect answer. No-op for an already-correct question and
    /// idempotent for repeated wrong answers: the set never holds duplicates.
    pub fn mark_incorrect(&mut self, id: QuestionId) {
        if !self.correct.contains(&id) {
            self.incorrect.insert(id);
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
