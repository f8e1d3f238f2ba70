use crate::helpers::{
    DETECT_PATH, FakeCamera, OpenBehavior, build_orchestrator, mount_status, spy_platform,
    test_config,
};

use vibewise_core::orchestrator::{
    DetectOutcome, DetectionState, OrchestratorHandle, StartOutcome,
};

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_state(handle: &OrchestratorHandle, wanted: &DetectionState) {
    for _ in 0..200 {
        if handle.state().await.expect("actor alive") == *wanted {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("orchestrator never reached {wanted}");
}

/// **VALUE**: End-to-end through the actor: start, detect, result.
#[tokio::test]
async fn given_actor_when_started_and_detected_then_result_state() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "happy", "confidence": 0.87})),
        )
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let handle = OrchestratorHandle::spawn(build_orchestrator(
        &test_config(&server),
        platform,
        camera.clone(),
    ));

    let started = handle.start().await.expect("actor alive");
    let detected = handle.detect().await.expect("actor alive");

    assert!(matches!(started, StartOutcome::CameraReady(_)));
    assert!(matches!(detected, DetectOutcome::Detected(ref r) if r.mood() == "happy"));
    assert!(matches!(
        handle.state().await.expect("actor alive"),
        DetectionState::Result(_)
    ));
    assert_eq!(camera.tracks(), 0);
}

/// **VALUE**: Stop during classification discards the late answer.
///
/// **WHY THIS MATTERS**: There is no way to cancel the outbound request; the
/// answer must not resurrect a workflow the user already stopped.
///
/// **BUG THIS CATCHES**: Would catch the actor blocking on classification (so
/// stop waits), or a stale answer flipping the state to `Result`.
#[tokio::test]
async fn given_classification_in_flight_when_stopped_then_late_answer_discarded() {
    // GIVEN: a slow classifier
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"mood": "happy", "confidence": 0.9}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let handle = OrchestratorHandle::spawn(build_orchestrator(
        &test_config(&server),
        platform,
        camera.clone(),
    ));
    handle.start().await.expect("actor alive");

    let detecting = tokio::spawn({
        let handle = handle.clone();
        async move { handle.detect().await }
    });
    wait_for_state(&handle, &DetectionState::Classifying).await;

    // WHEN: the user stops before the answer arrives
    let released = handle.stop().await.expect("actor alive");

    // THEN: the stop is immediate and the answer is dropped when it lands
    assert!(released);
    assert_eq!(camera.tracks(), 0);
    assert_eq!(handle.state().await.expect("actor alive"), DetectionState::Idle);

    let outcome = detecting
        .await
        .expect("task joined")
        .expect("actor alive");
    assert_eq!(outcome, DetectOutcome::Discarded);
    assert_eq!(handle.state().await.expect("actor alive"), DetectionState::Idle);
}

/// **VALUE**: Two concurrent starts through the actor open one device.
#[tokio::test]
async fn given_concurrent_starts_when_processed_then_single_camera() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let handle = OrchestratorHandle::spawn(build_orchestrator(
        &test_config(&server),
        platform,
        camera.clone(),
    ));

    let (first, second) = tokio::join!(handle.start(), handle.start());

    let outcomes = [first.expect("actor alive"), second.expect("actor alive")];
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, StartOutcome::CameraReady(_)))
            .count(),
        1
    );
    assert!(outcomes.contains(&StartOutcome::Ignored));
    assert_eq!(camera.opens(), 1);
    assert_eq!(spies.confirmation.prompt_count(), 0);
}

#[tokio::test]
async fn given_all_handles_dropped_when_actor_exits_then_camera_released() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let handle = OrchestratorHandle::spawn(build_orchestrator(
        &test_config(&server),
        platform,
        camera.clone(),
    ));
    handle.start().await.expect("actor alive");
    assert_eq!(camera.tracks(), 1);

    drop(handle);

    for _ in 0..200 {
        if camera.tracks() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("camera still live after actor shutdown");
}
