use crate::helpers::{
    DETECT_PATH, PLAYLIST_PATH, STATUS_PATH, TEST_CSRF_TOKEN, capture_test_frame, request_count,
    test_config,
};

use vibewise_core::api_client::VibewiseClient;
use vibewise_core::error::ApiError;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies a session cookie seeded from config is sent on status checks.
///
/// **WHY THIS MATTERS**: The server identifies the user only by that cookie.
///
/// **BUG THIS CATCHES**: Would catch the cookie jar not being wired into the client.
#[tokio::test]
async fn given_session_cookie_in_config_when_status_fetched_then_cookie_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(header("cookie", "sessionid=abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connected": true, "user": {"name": "Ada"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut config = test_config(&server);
    config.server.session_cookie = Some(String::from("sessionid=abc123"));
    let client = VibewiseClient::new(&config.server).expect("client");

    // WHEN
    let state = client.fetch_status().await.expect("status");

    // THEN
    assert!(state.is_connected());
    assert_eq!(state.display_name(), Some("Ada"));
}

/// **VALUE**: Every status failure mode maps to `AuthUnavailable`.
///
/// **BUG THIS CATCHES**: Would catch a JSON or timeout error leaking through as
/// another variant that callers do not treat as "logged out".
#[tokio::test]
async fn given_broken_status_responses_when_fetched_then_auth_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;
    let client = VibewiseClient::new(&test_config(&server).server).expect("client");

    let err = client.fetch_status().await.expect_err("should fail");
    assert!(matches!(err, ApiError::AuthUnavailable { .. }));

    let mut slow_config = test_config(&server);
    slow_config.server.request_timeout_secs = 1;
    server.reset().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connected": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let slow_client = VibewiseClient::new(&slow_config.server).expect("client");

    let err = slow_client.fetch_status().await.expect_err("should time out");
    assert_eq!(err.error_category(), "auth_unavailable");
}

/// **VALUE**: The detection request carries the token header and the privacy flag.
#[tokio::test]
async fn given_frame_when_detected_then_request_has_token_and_no_save_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .and(header("X-CSRFToken", TEST_CSRF_TOKEN))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "neutral", "confidence": 0.31})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = VibewiseClient::new(&test_config(&server).server).expect("client");
    let frame = capture_test_frame().await;

    let result = client.detect_mood(frame).await.expect("detected");

    assert_eq!(result.mood(), "neutral");
    assert_eq!(result.confidence_display(), "31.0%");

    let requests = server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = requests[0].body_json().expect("json");
    assert_eq!(body["save_image"], json!(false));
}

/// **VALUE**: An out-of-range confidence from the server is refused.
///
/// **BUG THIS CATCHES**: Would catch "130.0%" being shown to the user.
#[tokio::test]
async fn given_invalid_confidence_when_detected_then_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "happy", "confidence": 1.3})),
        )
        .mount(&server)
        .await;
    let client = VibewiseClient::new(&test_config(&server).server).expect("client");

    let err = client
        .detect_mood(capture_test_frame().await)
        .await
        .expect_err("should fail");

    assert_eq!(err.error_category(), "invalid_response");
}

/// **VALUE**: A 200 with a body that is not JSON is reported as a decode failure.
///
/// **BUG THIS CATCHES**: Would catch an HTML error page from a proxy being
/// filed as a network error.
#[tokio::test]
async fn given_html_body_when_detected_then_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let client = VibewiseClient::new(&test_config(&server).server).expect("client");

    let err = client
        .detect_mood(capture_test_frame().await)
        .await
        .expect_err("should fail");

    assert_eq!(err.error_category(), "json");
}

/// **VALUE**: Playlist body without `playlist` is a rejection, even on 200.
#[tokio::test]
async fn given_playlist_response_without_playlist_when_created_then_remote_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "hmm"})))
        .mount(&server)
        .await;
    let client = VibewiseClient::new(&test_config(&server).server).expect("client");

    let err = client.create_playlist("happy").await.expect_err("should fail");

    assert_eq!(err.status_code(), Some(200));
    assert_eq!(err.user_message(), "Failed to create playlist");
}

#[tokio::test]
async fn given_form_token_only_when_playlist_created_then_form_token_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .and(header("X-CSRFToken", "form-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlist": {"name": "Calm"},
            "spotify_url": "https://open.spotify.com/playlist/x",
            "message": "Made for a calm afternoon"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut config = test_config(&server);
    config.server.csrf_meta_token = None;
    config.server.csrf_form_token = Some(String::from("form-token"));
    let client = VibewiseClient::new(&config.server).expect("client");

    let info = client.create_playlist("calm").await.expect("created");

    assert_eq!(info.summary(), "Made for a calm afternoon");
    assert_eq!(request_count(&server, PLAYLIST_PATH).await, 1);
}
