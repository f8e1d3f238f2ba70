// Unit tests for DetectionState helpers

use crate::orchestrator::DetectionState;

use models::DetectionResult;

/// **VALUE**: Verifies `start` is only accepted from resting states.
///
/// **WHY THIS MATTERS**: Accepting `start` mid-capture would open a second
/// device or prompt for login twice.
///
/// **BUG THIS CATCHES**: Would catch a busy state being treated as a resting state.
#[test]
fn given_each_state_when_asked_then_only_resting_states_accept_start() {
    let result = DetectionResult::new("happy", 0.87).expect("valid");

    assert!(DetectionState::Idle.accepts_start());
    assert!(DetectionState::Result(result).accepts_start());
    assert!(DetectionState::Error(String::from("x")).accepts_start());

    for busy in [
        DetectionState::AuthChecking,
        DetectionState::CameraStarting,
        DetectionState::CameraReady,
        DetectionState::Detecting,
        DetectionState::Classifying,
        DetectionState::Redirecting(String::from("/login/")),
    ] {
        assert!(!busy.accepts_start(), "{busy} should not accept start");
    }
}

#[test]
fn given_result_state_when_displayed_then_shows_label_and_percentage() {
    let state = DetectionState::Result(DetectionResult::new("happy", 0.87).expect("valid"));

    assert_eq!(state.to_string(), "result: 😊 Happy (87.0%)");
    assert!(!state.is_capture_phase());
    assert!(DetectionState::Classifying.is_capture_phase());
}
