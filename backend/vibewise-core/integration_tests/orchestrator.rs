use crate::helpers::{
    DETECT_PATH, FakeCamera, LOGOUT_PATH, OpenBehavior, PLAYLIST_PATH, STATUS_PATH,
    TEST_CSRF_TOKEN, build_orchestrator, mount_delayed_status, mount_status, request_count,
    spy_platform, test_config,
};

use vibewise_core::error::ApiError;
use vibewise_core::orchestrator::{
    DetectOutcome, DetectionOrchestrator, DetectionState, PlaylistOutcome, StartOutcome,
};
use vibewise_core::platform::NotificationLevel;
use vibewise_core::session::{AuthGate, LogoutOutcome};

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_detect(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .and(header("X-CSRFToken", TEST_CSRF_TOKEN))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn started(orchestrator: &mut DetectionOrchestrator) {
    let outcome = orchestrator.start().await;
    assert!(
        matches!(outcome, StartOutcome::CameraReady(_)),
        "expected camera ready, got {outcome:?}"
    );
}

async fn request_bodies(server: &MockServer, request_path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .map(|r| r.body_json::<Value>().expect("json body"))
        .collect()
}

/// **VALUE**: Logged-in start opens the camera and announces it.
#[tokio::test]
async fn given_logged_in_when_started_then_camera_ready() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());

    started(&mut orchestrator).await;

    assert_eq!(orchestrator.state(), &DetectionState::CameraReady);
    assert_eq!(camera.tracks(), 1);
    assert!(orchestrator.resources().is_surface_visible());
    assert!(spies.notifier.contains(NotificationLevel::Success, "Camera started successfully!"));
}

/// **VALUE**: Scenario: logged out, prompt accepted.
///
/// **BUG THIS CATCHES**: Would catch the camera being opened before login, or
/// the workflow staying busy instead of terminal.
#[tokio::test]
async fn given_logged_out_and_accepted_when_started_then_redirecting_without_camera() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());

    let outcome = orchestrator.start().await;

    assert_eq!(outcome, StartOutcome::Redirecting);
    assert_eq!(
        orchestrator.state(),
        &DetectionState::Redirecting(String::from("/login/"))
    );
    assert_eq!(camera.opens(), 0);
    assert_eq!(spies.navigator.targets(), vec![String::from("/login/")]);

    let intent = orchestrator
        .session()
        .intent_slot()
        .take()
        .expect("intent recorded");
    assert!(intent.auto_start_capture());

    assert_eq!(orchestrator.start().await, StartOutcome::Ignored);
}

#[tokio::test]
async fn given_logged_out_and_declined_when_started_then_back_to_idle() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(false);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());

    let outcome = orchestrator.start().await;

    assert_eq!(outcome, StartOutcome::Declined);
    assert_eq!(orchestrator.state(), &DetectionState::Idle);
    assert_eq!(camera.opens(), 0);
}

/// **VALUE**: Scenario: permission denied.
///
/// **WHY THIS MATTERS**: The user needs to be told to allow access, and no
/// half-open device may linger.
///
/// **BUG THIS CATCHES**: Would catch a generic error message or a handle kept
/// after the failed open.
#[tokio::test]
async fn given_permission_denied_when_started_then_error_with_allow_message() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::PermissionDenied));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());

    // WHEN
    let outcome = orchestrator.start().await;

    // THEN
    let StartOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("allow camera access"));
    assert!(matches!(orchestrator.state(), DetectionState::Error(m) if m.contains("allow camera access")));
    assert!(orchestrator.resources().active_handle().is_none());
    assert_eq!(camera.tracks(), 0);
    assert!(spies.notifier.contains(NotificationLevel::Error, "allow camera access"));

    // Error is a resting state: start is accepted again
    assert!(orchestrator.state().accepts_start());
}

#[tokio::test]
async fn given_no_device_when_started_then_error_names_missing_camera() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::NotFound));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);

    let outcome = orchestrator.start().await;

    assert_eq!(
        outcome,
        StartOutcome::Failed {
            message: String::from("Failed to access camera. No camera found on your device.")
        }
    );
}

/// **VALUE**: `start` while the camera is up neither prompts nor opens again.
#[tokio::test]
async fn given_camera_ready_when_started_again_then_ignored() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.start().await;

    assert_eq!(outcome, StartOutcome::Ignored);
    assert_eq!(camera.opens(), 1);
    assert_eq!(request_count(&server, STATUS_PATH).await, 1);
}

#[tokio::test]
async fn given_idle_when_detect_then_ignored_without_requests() {
    let server = MockServer::start().await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);

    assert_eq!(orchestrator.detect().await, DetectOutcome::Ignored);
    assert_eq!(request_count(&server, DETECT_PATH).await, 0);
}

/// **VALUE**: Scenario: classification answers 401.
///
/// **WHY THIS MATTERS**: The camera must be off before the page leaves for login.
///
/// **BUG THIS CATCHES**: Would catch the redirect path skipping release, or a
/// result being shown for an expired session.
#[tokio::test]
async fn given_classification_unauthorized_when_detected_then_released_and_redirecting() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(
        &server,
        ResponseTemplate::new(401).set_body_json(json!({"error": "Authentication required."})),
    )
    .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    // WHEN
    let outcome = orchestrator.detect().await;

    // THEN
    assert_eq!(outcome, DetectOutcome::Redirecting);
    assert_eq!(
        orchestrator.state(),
        &DetectionState::Redirecting(String::from("/login/"))
    );
    assert_eq!(camera.tracks(), 0);
    assert!(!orchestrator.resources().is_surface_visible());
    assert!(spies.notifier.contains(
        NotificationLevel::Error,
        "Session expired. Please login again."
    ));
    assert_eq!(spies.navigator.targets(), vec![String::from("/login/")]);
    assert!(!orchestrator.session().current().await.is_connected());
}

/// **VALUE**: Session gone by the time of capture: release, redirect, never capture.
///
/// **BUG THIS CATCHES**: Would catch a frame being sent after the re-check failed.
#[tokio::test]
async fn given_session_lost_before_capture_when_detected_then_no_frame_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, false).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.detect().await;

    assert_eq!(outcome, DetectOutcome::Redirecting);
    assert_eq!(camera.tracks(), 0);
    assert_eq!(request_count(&server, DETECT_PATH).await, 0);
    assert_eq!(spies.confirmation.prompt_count(), 0);
}

/// **VALUE**: Scenario: successful detection, then playlist for that exact mood.
///
/// **WHY THIS MATTERS**: The playlist is built from the label the classifier
/// returned; any reformatting (capitalised label, emoji) changes the result.
///
/// **BUG THIS CATCHES**: Would catch the display label being posted instead of
/// the raw mood, or the camera staying on after a result.
#[tokio::test]
async fn given_happy_face_when_detected_then_result_and_playlist_uses_exact_mood() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "mood": "happy",
            "confidence": 0.87,
            "privacy": "Image processed but not saved"
        })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .and(header("X-CSRFToken", TEST_CSRF_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlist": {"name": "Happy Vibes"},
            "spotify_url": "https://open.spotify.com/playlist/abc",
            "genres_used": ["pop", "dance"]
        })))
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    // WHEN: detect
    let outcome = orchestrator.detect().await;

    // THEN: result shown, camera off
    let DetectOutcome::Detected(result) = outcome else {
        panic!("expected detection, got {outcome:?}");
    };
    assert_eq!(result.confidence_display(), "87.0%");
    assert_eq!(result.mood_label(), "Happy");
    assert!(matches!(orchestrator.state(), DetectionState::Result(_)));
    assert_eq!(camera.tracks(), 0);
    assert!(spies.notifier.contains(NotificationLevel::Success, "Mood detected! Camera stopped."));

    let detect_bodies = request_bodies(&server, DETECT_PATH).await;
    assert_eq!(detect_bodies.len(), 1);
    assert_eq!(detect_bodies[0]["save_image"], json!(false));
    assert!(
        detect_bodies[0]["image"]
            .as_str()
            .is_some_and(|s| s.starts_with("data:image/jpeg;base64,"))
    );

    // WHEN: playlist
    let playlist = orchestrator.create_playlist().await;

    // THEN
    let PlaylistOutcome::Created(info) = playlist else {
        panic!("expected playlist, got {playlist:?}");
    };
    assert_eq!(info.playlist.name, "Happy Vibes");
    assert_eq!(info.summary(), "Based on pop, dance");
    assert_eq!(
        request_bodies(&server, PLAYLIST_PATH).await,
        vec![json!({"mood": "happy"})]
    );
    assert!(spies.notifier.contains(NotificationLevel::Info, "Creating your personalized playlist..."));
    assert!(spies.notifier.contains(NotificationLevel::Success, "Playlist created successfully!"));
}

/// **VALUE**: Classification failure releases the camera and never leaks the frame.
///
/// **WHY THIS MATTERS**: Error paths are where captured images tend to end up in
/// logs or notifications.
///
/// **BUG THIS CATCHES**: Would catch an abandoned camera on the error branch, or
/// the image payload reaching a notification, navigation or stored intent.
#[tokio::test]
async fn given_classifier_error_when_detected_then_error_released_and_no_payload_retained() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to detect mood from image"})),
    )
    .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    // WHEN
    let outcome = orchestrator.detect().await;

    // THEN
    let expected = String::from("Error: Failed to detect mood from image");
    assert_eq!(outcome, DetectOutcome::Failed { message: expected.clone() });
    assert_eq!(orchestrator.state(), &DetectionState::Error(expected));
    assert_eq!(camera.tracks(), 0);

    let bodies = request_bodies(&server, DETECT_PATH).await;
    assert_eq!(bodies[0]["save_image"], json!(false));

    assert!(
        spies
            .notifier
            .messages()
            .iter()
            .all(|(_, m)| !m.contains("base64"))
    );
    assert!(spies.navigator.targets().iter().all(|t| !t.contains("base64")));
    assert!(!orchestrator.session().intent_slot().is_occupied());
}

#[tokio::test]
async fn given_unreadable_error_body_when_detected_then_fallback_message() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(&server, ResponseTemplate::new(502).set_body_string("bad gateway")).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.detect().await;

    assert_eq!(
        outcome,
        DetectOutcome::Failed {
            message: String::from("Error: Failed to detect mood")
        }
    );
    assert_eq!(camera.tracks(), 0);
}

/// **VALUE**: Mutating calls without a CSRF token fail locally and release the camera.
#[tokio::test]
async fn given_no_csrf_token_when_detected_then_error_without_request() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let mut config = test_config(&server);
    config.server.csrf_meta_token = None;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&config, platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.detect().await;

    assert_eq!(
        outcome,
        DetectOutcome::Failed {
            message: String::from("Error: CSRF token not found. Please refresh and try again.")
        }
    );
    assert_eq!(request_count(&server, DETECT_PATH).await, 0);
    assert_eq!(camera.tracks(), 0);
}

#[tokio::test]
async fn given_stream_without_dimensions_when_detected_then_capture_error_and_released() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed).without_dimensions());
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.detect().await;

    assert!(matches!(outcome, DetectOutcome::Failed { .. }));
    assert_eq!(camera.tracks(), 0);
    assert_eq!(request_count(&server, DETECT_PATH).await, 0);
}

/// **VALUE**: A failed playlist keeps the result on screen so the user can retry.
#[tokio::test]
async fn given_playlist_rejected_when_created_then_result_kept_and_error_shown() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"mood": "sad", "confidence": 0.5})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "No Spotify token"})),
        )
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);
    started(&mut orchestrator).await;
    orchestrator.detect().await;

    let outcome = orchestrator.create_playlist().await;

    assert_eq!(
        outcome,
        PlaylistOutcome::Failed {
            message: String::from("Failed to create playlist: No Spotify token")
        }
    );
    assert!(matches!(orchestrator.state(), DetectionState::Result(r) if r.mood() == "sad"));
    assert!(spies.notifier.contains(NotificationLevel::Error, "Failed to create playlist: No Spotify token"));
}

#[tokio::test]
async fn given_playlist_unauthorized_when_created_then_redirecting() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"mood": "calm", "confidence": 0.4})),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);
    started(&mut orchestrator).await;
    orchestrator.detect().await;

    let outcome = orchestrator.create_playlist().await;

    assert_eq!(outcome, PlaylistOutcome::Redirecting);
    assert!(orchestrator.state().is_redirecting());
    assert_eq!(spies.navigator.targets(), vec![String::from("/login/")]);
}

#[tokio::test]
async fn given_idle_when_playlist_requested_then_ignored() {
    let server = MockServer::start().await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);

    assert_eq!(orchestrator.create_playlist().await, PlaylistOutcome::Ignored);
    assert_eq!(request_count(&server, PLAYLIST_PATH).await, 0);
}

#[tokio::test]
async fn given_camera_ready_when_stopped_then_idle_and_released() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    assert!(orchestrator.stop());
    assert!(!orchestrator.stop());

    assert_eq!(orchestrator.state(), &DetectionState::Idle);
    assert_eq!(camera.tracks(), 0);
    assert!(spies.notifier.contains(NotificationLevel::Info, "Camera stopped"));
}

/// **VALUE**: After the login round-trip the camera starts by itself, once.
///
/// **BUG THIS CATCHES**: Would catch the intent not surviving to the next page
/// load, or being honoured on every later visit.
#[tokio::test]
async fn given_return_from_login_when_resumed_then_camera_starts_once() {
    // GIVEN: first visit, logged out, prompt accepted
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": false})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_status(&server, true).await;
    let config = test_config(&server);
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut first_visit = build_orchestrator(&config, platform, camera.clone());
    assert_eq!(first_visit.start().await, StartOutcome::Redirecting);

    // WHEN: the capture page loads again in the same tab
    let mut second_visit =
        DetectionOrchestrator::new(first_visit.session().clone(), camera.clone(), &config.camera);
    let resumed = second_visit.resume_after_login().await;

    // THEN
    assert!(matches!(resumed, Some(StartOutcome::CameraReady(_))));
    assert_eq!(camera.tracks(), 1);
    assert!(second_visit.resume_after_login().await.is_none());
}

/// **VALUE**: Logout turns the camera off before leaving the page.
#[tokio::test]
async fn given_camera_ready_when_logged_out_then_camera_released_and_root_shown() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let outcome = orchestrator.logout().await.expect("logout");

    assert_eq!(outcome, LogoutOutcome::LoggedOut);
    assert_eq!(camera.tracks(), 0);
    assert_eq!(orchestrator.state(), &DetectionState::Idle);
    assert_eq!(spies.navigator.targets(), vec![String::from("/")]);
}

/// **VALUE**: A logout that cannot be sent keeps the camera running.
///
/// **BUG THIS CATCHES**: Would catch the camera being torn down before the
/// server confirmed the logout, leaving a dead preview on a logged-in page.
#[tokio::test]
async fn given_no_csrf_token_when_logged_out_then_camera_kept() {
    // GIVEN: camera running, no CSRF token configured
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let mut config = test_config(&server);
    config.server.csrf_meta_token = None;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&config, platform, camera.clone());
    started(&mut orchestrator).await;

    // WHEN
    let result = orchestrator.logout().await;

    // THEN
    assert!(matches!(result, Err(ApiError::MissingCsrfToken { .. })));
    assert_eq!(camera.tracks(), 1);
    assert_eq!(orchestrator.state(), &DetectionState::CameraReady);
    assert_eq!(request_count(&server, LOGOUT_PATH).await, 0);
    assert!(spies.navigator.targets().is_empty());
}

/// **VALUE**: A server-refused logout keeps the camera running too.
#[tokio::test]
async fn given_server_refuses_logout_when_logged_out_then_camera_kept() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "nope"})),
        )
        .mount(&server)
        .await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera.clone());
    started(&mut orchestrator).await;

    let result = orchestrator.logout().await;

    assert!(result.is_err());
    assert_eq!(camera.tracks(), 1);
    assert_eq!(orchestrator.state(), &DetectionState::CameraReady);
}

/// **VALUE**: A start swallowed by a busy auth gate keeps the shown error.
///
/// **BUG THIS CATCHES**: Would catch the error display being wiped to idle by
/// a click that did nothing.
#[tokio::test]
async fn given_error_shown_when_start_hits_busy_gate_then_error_kept() {
    // GIVEN: a failed start left an error on screen
    let server = MockServer::start().await;
    mount_delayed_status(&server, Duration::from_millis(200)).await;
    let camera = Arc::new(FakeCamera::new(OpenBehavior::PermissionDenied));
    let (platform, _spies) = spy_platform(true);
    let mut orchestrator = build_orchestrator(&test_config(&server), platform, camera);
    assert!(matches!(orchestrator.start().await, StartOutcome::Failed { .. }));
    let shown = orchestrator.state().clone();
    assert!(matches!(shown, DetectionState::Error(_)));
    let session = orchestrator.session().clone();

    // WHEN: another gated check is already running
    let (gate, outcome) = tokio::join!(session.require_authenticated(true), orchestrator.start());

    // THEN
    assert_eq!(gate, AuthGate::Authenticated);
    assert_eq!(outcome, StartOutcome::Ignored);
    assert_eq!(orchestrator.state(), &shown);
}
