//! Integration tests for status polling cadence and termination

use std::time::Duration;
use tokio::sync::mpsc;
use tripgen::workflow::OutcomeStatus;
use tripgen::{FailureReason, ServiceError, TaskStatus, WorkflowEvent};

use crate::integration::support::{
    completed, pending, request, sample_document, workflow, RecordingShare, ScriptedGeneration,
    Step,
};

#[tokio::test(start_paused = true)]
async fn test_pending_then_completed_queries_every_interval() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script(
        "task-1",
        vec![pending(), pending(), pending(), completed(&doc)],
    );
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), Some("token".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.result(), Some(&doc));
    let queries = generation.queries();
    assert_eq!(queries.len(), 4);
    for pair in queries.windows(2) {
        assert_eq!(pair[1].at - pair[0].at, Duration::from_secs(2));
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_query_is_immediate() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script("task-1", vec![completed(&doc)]);
    let share = RecordingShare::succeeding("share-1");

    let start = tokio::time::Instant::now();
    let outcome = workflow(&generation, &share)
        .submit(request(), Some("token".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::Completed);
    assert_eq!(generation.queries()[0].at, start);
}

#[tokio::test(start_paused = true)]
async fn test_never_finishing_task_times_out_after_ceiling() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1"));
    let share = RecordingShare::succeeding("share-1");

    let start = tokio::time::Instant::now();
    let outcome = workflow(&generation, &share)
        .submit(request(), None)
        .await
        .unwrap();

    assert_eq!(outcome.failure(), Some(&FailureReason::Timeout));
    assert_eq!(generation.query_count(), 150);
    assert_eq!(tokio::time::Instant::now() - start, Duration::from_secs(298));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(generation.query_count(), 150, "no queries after timeout");
    assert!(share.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_then_completion() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script(
        "task-1",
        vec![
            Step::Error(ServiceError::Transport("connection reset".to_string())),
            Step::Error(ServiceError::Unauthorized("token expired".to_string())),
            pending(),
            completed(&doc),
        ],
    );
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), None)
        .await
        .unwrap();

    assert_eq!(outcome.result(), Some(&doc));
    assert_eq!(generation.query_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_fails_without_further_queries() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script(
        "task-1",
        vec![
            pending(),
            Step::Error(ServiceError::NotFound("task-1".to_string())),
        ],
    );
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), None)
        .await
        .unwrap();

    assert_eq!(outcome.failure(), Some(&FailureReason::TaskNotFound));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(generation.query_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_task_failure_carries_reason() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script(
        "task-1",
        vec![Step::Status(TaskStatus::Failed {
            reason: "model returned invalid JSON".to_string(),
        })],
    );
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), None)
        .await
        .unwrap();

    assert_eq!(
        outcome.failure(),
        Some(&FailureReason::TaskFailed(
            "model returned invalid JSON".to_string()
        ))
    );
    assert!(share.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_submission_failure_never_polls() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Err(ServiceError::RequestFailed {
        status: 503,
        body: "maintenance".to_string(),
    }));
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), None)
        .await
        .unwrap();

    assert!(matches!(
        outcome.failure(),
        Some(FailureReason::Submission(ServiceError::RequestFailed { status: 503, .. }))
    ));
    assert_eq!(generation.query_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_report_for_foreign_task_is_discarded() {
    let doc = sample_document();
    let stale = tripgen::ItineraryDocument::new(serde_json::json!({ "stale": true }));
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script(
        "task-1",
        vec![
            Step::Foreign(
                "task-0".to_string(),
                TaskStatus::Completed { result: stale },
            ),
            completed(&doc),
        ],
    );
    let share = RecordingShare::succeeding("share-1");

    let outcome = workflow(&generation, &share)
        .submit(request(), Some("token".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.result(), Some(&doc));
    assert_eq!(generation.query_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_auth_token_is_forwarded_to_status_queries() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-1"))
        .script("task-1", vec![pending(), completed(&doc)]);
    let share = RecordingShare::succeeding("share-1");

    workflow(&generation, &share)
        .submit(request(), Some("secret".to_string()))
        .await
        .unwrap();

    assert!(generation
        .queries()
        .iter()
        .all(|q| q.auth_token.as_deref() == Some("secret")));
}

#[tokio::test(start_paused = true)]
async fn test_lifecycle_events_in_order() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-1"))
        .script("task-1", vec![pending(), completed(&doc)]);
    let share = RecordingShare::succeeding("share-1");
    let (sender, mut receiver) = mpsc::unbounded_channel();

    let workflow = workflow(&generation, &share).with_events(sender);
    workflow.submit(request(), None).await.unwrap();
    drop(workflow);

    let mut events = Vec::new();
    while let Some(event) = receiver.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 5);
    assert!(matches!(&events[0], WorkflowEvent::Submitted { task, .. } if task.as_str() == "task-1"));
    assert!(matches!(
        events[1],
        WorkflowEvent::Polling { attempt: 1, max_attempts: 150, .. }
    ));
    assert!(matches!(events[2], WorkflowEvent::Polling { attempt: 2, .. }));
    assert!(matches!(events[3], WorkflowEvent::Sharing { .. }));
    assert!(matches!(
        events[4],
        WorkflowEvent::Finished { status: OutcomeStatus::Completed, .. }
    ));
    let session = events[0].session();
    assert!(events.iter().all(|e| e.session() == session));
}
