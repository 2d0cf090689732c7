use quiz_core::model::Question;

/// Signal surface for the presentation collaborator.
///
/// The session core knows nothing about rendering; a thin UI adapter
/// implements this trait and the driver invokes it at the state transitions
/// a display cares about.
pub trait SessionEvents {
    /// A question has been selected and should be shown.
    fn question_ready(&self, question: &Question);

    /// An answer was applied; show correctness and the true answer.
    fn answer_feedback(&self, is_correct: bool, correct_answer: &str);

    /// Every question has been answered correctly.
    fn session_complete(&self, incorrect_attempts: u32);

    /// A fatal load error replaced the question display.
    fn load_error(&self, reason: &str);
}
