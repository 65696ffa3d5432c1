//! Integration tests for cooperative cancellation

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tripgen::workflow::OutcomeStatus;
use tripgen::Outcome;

use crate::integration::support::{
    completed, pending, request, sample_document, workflow, RecordingShare, ScriptedGeneration,
};

#[tokio::test(start_paused = true)]
async fn test_cancel_while_query_in_flight() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-1"))
        .script("task-1", vec![completed(&doc)])
        .latency("task-1", Duration::from_secs(5));
    let share = RecordingShare::succeeding("share-1");
    let workflow = Arc::new(workflow(&generation, &share));

    let running = tokio::spawn({
        let workflow = workflow.clone();
        async move { workflow.submit(request(), None).await }
    });
    sleep(Duration::from_secs(1)).await;
    workflow.cancel();

    let outcome = running.await.unwrap().unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(generation.query_count(), 1);
    assert!(share.calls().is_empty(), "cancelled result is never shared");
    assert!(workflow.active_session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_interrupts_poll_delay() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script("task-1", vec![pending()]);
    let share = RecordingShare::succeeding("share-1");
    let workflow = workflow(&generation, &share);

    let start = Instant::now();
    let cancel_later = async {
        sleep(Duration::from_millis(500)).await;
        workflow.cancel();
    };
    let (outcome, ()) = futures::future::join(workflow.submit(request(), None), cancel_later).await;

    assert_eq!(outcome.unwrap().status(), OutcomeStatus::Cancelled);
    assert_eq!(Instant::now() - start, Duration::from_millis(500));
    sleep(Duration::from_secs(10)).await;
    assert_eq!(generation.query_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_is_idempotent() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1"));
    let share = RecordingShare::succeeding("share-1");
    let workflow = workflow(&generation, &share);

    let cancel_twice = async {
        sleep(Duration::from_secs(3)).await;
        workflow.cancel();
        workflow.cancel();
    };
    let (outcome, ()) = futures::future::join(workflow.submit(request(), None), cancel_twice).await;

    assert_eq!(outcome.unwrap(), Outcome::Cancelled);
    workflow.cancel();
    assert!(workflow.active_session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_cancel_after_completion_is_noop() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script("task-1", vec![completed(&doc)]);
    let share = RecordingShare::succeeding("share-1");
    let workflow = workflow(&generation, &share);

    let outcome = workflow.submit(request(), None).await.unwrap();
    workflow.cancel();

    assert_eq!(outcome.result(), Some(&doc));
    assert_eq!(outcome.share().map(|s| s.token.as_str()), Some("share-1"));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_with_nothing_running_does_not_affect_next_submit() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script("task-1", vec![completed(&doc)]);
    let share = RecordingShare::succeeding("share-1");
    let workflow = workflow(&generation, &share);

    workflow.cancel();
    let outcome = workflow
        .submit(request(), Some("token".to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_right_after_start() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1"));
    let share = RecordingShare::succeeding("share-1");
    let workflow = workflow(&generation, &share);

    // Lands while the first poll delay is running.
    let cancel_now = async {
        tokio::task::yield_now().await;
        workflow.cancel();
    };
    let (outcome, ()) = futures::future::join(workflow.submit(request(), None), cancel_now).await;

    assert_eq!(outcome.unwrap(), Outcome::Cancelled);
    assert_eq!(generation.query_count(), 1);
    assert_eq!(generation.submit_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_share_creation() {
    let doc = sample_document();
    let generation = ScriptedGeneration::new();
    generation.on_submit(Ok("task-1")).script("task-1", vec![completed(&doc)]);
    let share = RecordingShare::slow("share-1", Duration::from_secs(5));
    let workflow = workflow(&generation, &share);

    let cancel_later = async {
        sleep(Duration::from_secs(1)).await;
        workflow.cancel();
    };
    let (outcome, ()) = futures::future::join(workflow.submit(request(), None), cancel_later).await;

    assert_eq!(outcome.unwrap(), Outcome::Cancelled);
    assert_eq!(share.calls().len(), 1, "share call was already in flight");
    assert!(workflow.active_session().is_none());
}
