//! Integration tests for request validation at the workflow boundary

use proptest::prelude::*;
use tripgen::GenerationRequest;

use crate::integration::support::{workflow, RecordingShare, ScriptedGeneration};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
}

/// Invalid requests never reach the generation service.
#[test]
fn test_invalid_requests_make_no_service_calls() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let rt = runtime();

    runner
        .run(
            &(
                prop_oneof![Just(String::new()), Just("   ".to_string()), "[a-z]{1,12}"],
                0u32..12,
                0u32..4,
            ),
            |(destination, days, travelers)| {
                let valid = !destination.trim().is_empty() && (1..=5).contains(&days) && travelers >= 1;
                prop_assume!(!valid);

                let generation = ScriptedGeneration::new();
                let share = RecordingShare::succeeding("unused");
                let request = GenerationRequest::new(destination)
                    .days(days)
                    .travelers(travelers);

                let result = rt.block_on(workflow(&generation, &share).submit(request, None));

                prop_assert!(result.is_err());
                prop_assert_eq!(generation.submit_count(), 0);
                prop_assert_eq!(generation.query_count(), 0);
                Ok(())
            },
        )
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_blank_destination_reported_first() {
    let generation = ScriptedGeneration::new();
    let share = RecordingShare::succeeding("unused");

    let err = workflow(&generation, &share)
        .submit(GenerationRequest::new("  ").days(9).travelers(0), None)
        .await
        .unwrap_err();

    assert_eq!(err.field, "destination");
}

#[tokio::test(start_paused = true)]
async fn test_day_bounds_are_inclusive() {
    for days in [1, 5] {
        let generation = ScriptedGeneration::new();
        generation.on_submit(Err(tripgen::ServiceError::Transport(
            "offline".to_string(),
        )));
        let share = RecordingShare::succeeding("unused");

        let outcome = workflow(&generation, &share)
            .submit(GenerationRequest::new("Dali").days(days), None)
            .await;

        assert!(outcome.is_ok(), "{} days should be accepted", days);
        assert_eq!(generation.submit_count(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_validated_request_is_submitted_as_built() {
    let generation = ScriptedGeneration::new();
    generation.on_submit(Err(tripgen::ServiceError::Transport(
        "offline".to_string(),
    )));
    let share = RecordingShare::succeeding("unused");
    let request = GenerationRequest::new("Dali")
        .days(3)
        .travelers(4)
        .budget("5000")
        .preference(tripgen::Preference::Food)
        .extra_requirements("vegetarian")
        .display_name("Spring break");

    workflow(&generation, &share)
        .submit(request.clone(), None)
        .await
        .unwrap();

    assert_eq!(generation.submitted(), vec![request]);
}
