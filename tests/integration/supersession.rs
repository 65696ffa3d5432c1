//! Integration tests for a second submit superseding the running one

use serde_json::json;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tripgen::workflow::OutcomeStatus;
use tripgen::{GenerationRequest, ItineraryDocument, Outcome, WorkflowEvent};

use crate::integration::support::{
    completed, pending, sample_document, workflow, RecordingShare, ScriptedGeneration,
};

fn first_request() -> GenerationRequest {
    GenerationRequest::new("Kyoto").days(3)
}

fn second_request() -> GenerationRequest {
    GenerationRequest::new("Lisbon").days(2)
}

#[tokio::test(start_paused = true)]
async fn test_late_completion_of_superseded_task_is_discarded() {
    let stale = ItineraryDocument::new(json!({ "destination": "Kyoto" }));
    let fresh = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-a"))
        .on_submit(Ok("task-b"))
        .script("task-a", vec![completed(&stale)])
        .latency("task-a", Duration::from_secs(3))
        .script("task-b", vec![completed(&fresh)]);
    let share = RecordingShare::succeeding("share-b");
    let workflow = workflow(&generation, &share);

    let second = async {
        sleep(Duration::from_secs(1)).await;
        workflow.submit(second_request(), None).await
    };
    let (first, second) =
        futures::future::join(workflow.submit(first_request(), None), second).await;

    assert_eq!(first.unwrap(), Outcome::Superseded);
    let second = second.unwrap();
    assert_eq!(second.result(), Some(&fresh));

    let calls = share.calls();
    assert_eq!(calls.len(), 1, "only the current session shares");
    assert_eq!(calls[0].0.as_value()["destination"], "Lisbon");
}

#[tokio::test(start_paused = true)]
async fn test_supersede_during_poll_delay() {
    let fresh = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-a"))
        .on_submit(Ok("task-b"))
        .script("task-b", vec![pending(), completed(&fresh)]);
    let share = RecordingShare::succeeding("share-b");
    let workflow = workflow(&generation, &share);

    let second = async {
        sleep(Duration::from_secs(3)).await;
        workflow
            .submit(second_request(), Some("token".to_string()))
            .await
    };
    let (first, second) =
        futures::future::join(workflow.submit(first_request(), None), second).await;

    assert_eq!(first.unwrap(), Outcome::Superseded);
    assert_eq!(second.unwrap().result(), Some(&fresh));
    // task-a was queried at 0s and 2s, then abandoned before its 4s query
    assert_eq!(generation.queries_for("task-a"), 2);
    assert_eq!(generation.queries_for("task-b"), 2);
    assert!(workflow.active_session().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_superseded_session_does_not_release_new_session() {
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-a"))
        .on_submit(Ok("task-b"))
        .latency("task-a", Duration::from_secs(3));
    let share = RecordingShare::succeeding("share-b");
    let workflow = workflow(&generation, &share);

    let observe = async {
        sleep(Duration::from_secs(1)).await;
        let second = workflow.submit(second_request(), None);
        tokio::pin!(second);
        // Let the first session observe the supersession while the second polls.
        tokio::select! {
            _ = &mut second => panic!("second session should still be pending"),
            _ = sleep(Duration::from_secs(5)) => {}
        }
        let active = workflow.active_session();
        workflow.cancel();
        (active, second.await)
    };
    let (first, (active, second)) =
        futures::future::join(workflow.submit(first_request(), None), observe).await;

    assert_eq!(first.unwrap(), Outcome::Superseded);
    assert!(active.is_some(), "new session still owns the slot");
    assert_eq!(second.unwrap().status(), OutcomeStatus::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_session_reports_finished_event() {
    let fresh = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-a"))
        .on_submit(Ok("task-b"))
        .script("task-b", vec![completed(&fresh)]);
    let share = RecordingShare::succeeding("share-b");
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let workflow = workflow(&generation, &share).with_events(sender);

    let second = async {
        sleep(Duration::from_secs(1)).await;
        workflow.submit(second_request(), None).await
    };
    futures::future::join(workflow.submit(first_request(), None), second).await;
    drop(workflow);

    let mut finished = Vec::new();
    while let Some(event) = receiver.recv().await {
        if let WorkflowEvent::Finished { session, status } = event {
            finished.push((session, status));
        }
    }
    assert_eq!(finished.len(), 2);
    let statuses: Vec<OutcomeStatus> = finished.iter().map(|(_, s)| *s).collect();
    assert!(statuses.contains(&OutcomeStatus::Superseded));
    assert!(statuses.contains(&OutcomeStatus::Completed));
    assert_ne!(finished[0].0, finished[1].0);
}

#[tokio::test(start_paused = true)]
async fn test_supersede_during_share_creation() {
    let stale = ItineraryDocument::new(json!({ "destination": "Kyoto" }));
    let fresh = sample_document();
    let generation = ScriptedGeneration::new();
    generation
        .on_submit(Ok("task-a"))
        .on_submit(Ok("task-b"))
        .script("task-a", vec![completed(&stale)])
        .script("task-b", vec![completed(&fresh)]);
    let share = RecordingShare::slow("share-a", Duration::from_secs(5));
    let workflow = workflow(&generation, &share);

    let second = async {
        sleep(Duration::from_secs(1)).await;
        workflow
            .submit(second_request(), Some("token".to_string()))
            .await
    };
    let (first, second) =
        futures::future::join(workflow.submit(first_request(), None), second).await;

    assert_eq!(first.unwrap(), Outcome::Superseded);
    let second = second.unwrap();
    assert_eq!(second.result(), Some(&fresh));
    assert!(second.share().is_none());
    assert_eq!(share.calls().len(), 1);
    assert!(workflow.active_session().is_none());
}
