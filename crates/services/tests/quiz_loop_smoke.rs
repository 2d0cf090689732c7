use backend::{Backend, InMemoryBackend};
use quiz_core::model::{ProgressSnapshot, Question, QuestionId};
use quiz_core::select::SequencePicker;
use quiz_core::session::NextQuestion;
use quiz_core::time::fixed_clock;
use services::{QuizLoadError, QuizLoopService};

fn build_question(id: u64) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Q{id}"),
        vec!["right".into(), "wrong".into()],
        "right",
    )
    .unwrap()
}

/// Lets the spawned record tasks run to completion. The in-memory sink has
/// no await points, so a yield per dispatched task is enough on the test
/// runtime.
async fn drain_dispatches() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn quiz_loop_runs_to_completion_and_records_every_attempt() {
    let memory = InMemoryBackend::new(vec![build_question(1), build_question(2)]);
    let service = QuizLoopService::new(
        fixed_clock(),
        Backend::from_memory(memory.clone()),
        "alice",
    );

    let mut session = service.start_session().await.unwrap();
    let mut picker = SequencePicker::new(vec![0, 0, 0, 0]);

    let mut missed_once = false;
    loop {
        match session.select_next(&mut picker).unwrap() {
            NextQuestion::Complete => break,
            NextQuestion::Ask(question) => {
                let choice = if missed_once {
                    question.answer().to_owned()
                } else {
                    missed_once = true;
                    "wrong".to_owned()
                };
                service.answer(&mut session, question.id(), &choice).unwrap();
            }
        }
    }

    assert!(session.is_complete());
    assert_eq!(session.incorrect_attempts(), 1);

    drain_dispatches().await;
    let recorded = memory.recorded_answers();
    assert_eq!(recorded.len(), 3);
    assert!(!recorded[0].is_correct);
    assert!(recorded.iter().all(|r| r.username == "alice"));
}

#[tokio::test]
async fn progress_fetch_failure_degrades_to_fresh_session() {
    let memory = InMemoryBackend::new(vec![build_question(1)])
        .with_progress(ProgressSnapshot {
            correct_ids: vec![QuestionId::new(1)],
            incorrect_ids: Vec::new(),
        })
        .with_failing_progress();
    let service = QuizLoopService::new(fixed_clock(), Backend::from_memory(memory), "alice");

    let session = service.start_session().await.unwrap();

    // the stored progress was unreachable, so nothing counts as answered
    assert_eq!(session.progress().correct_count(), 0);
    assert_eq!(session.working_pool(), vec![QuestionId::new(1)]);
}

#[tokio::test]
async fn catalog_fetch_failure_is_fatal() {
    let memory = InMemoryBackend::new(vec![build_question(1)]).with_failing_catalog();
    let service = QuizLoopService::new(fixed_clock(), Backend::from_memory(memory), "alice");

    let err = service.start_session().await.unwrap_err();
    assert!(matches!(err, QuizLoadError::Catalog(_)));
}

#[tokio::test]
async fn empty_catalog_is_fatal() {
    let memory = InMemoryBackend::new(Vec::new());
    let service = QuizLoopService::new(fixed_clock(), Backend::from_memory(memory), "alice");

    let err = service.start_session().await.unwrap_err();
    assert!(matches!(err, QuizLoadError::InvalidCatalog(_)));
}

#[tokio::test]
async fn record_sink_failure_never_blocks_progression() {
    let memory = InMemoryBackend::new(vec![build_question(1)]).with_failing_record();
    let service = QuizLoopService::new(
        fixed_clock(),
        Backend::from_memory(memory.clone()),
        "alice",
    );

    let mut session = service.start_session().await.unwrap();
    let result = service
        .answer(&mut session, QuestionId::new(1), "right")
        .unwrap();

    assert!(result.outcome.is_correct);
    assert!(session.is_complete());

    drain_dispatches().await;
    assert!(memory.recorded_answers().is_empty());
}

#[tokio::test]
async fn restart_refetches_progress_and_resets_the_counter() {
    let memory = InMemoryBackend::new(vec![build_question(1), build_question(2)]);
    let service = QuizLoopService::new(
        fixed_clock(),
        Backend::from_memory(memory.clone()),
        "alice",
    );

    let mut session = service.start_session().await.unwrap();
    for _ in 0..3 {
        service
            .answer(&mut session, QuestionId::new(1), "wrong")
            .unwrap();
    }
    assert_eq!(session.incorrect_attempts(), 3);

    service.restart(&mut session).await;
    assert_eq!(session.incorrect_attempts(), 0);
    assert_eq!(session.working_pool().len(), 2);

    drain_dispatches().await;
    assert_eq!(memory.recorded_answers().len(), 3);
}
