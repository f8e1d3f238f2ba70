use crate::helpers::{
    LOGOUT_PATH, STATUS_PATH, TEST_CSRF_TOKEN, build_session, mount_delayed_status, mount_status,
    request_count, spy_platform, test_config,
};

use vibewise_core::error::ApiError;
use vibewise_core::platform::NotificationLevel;
use vibewise_core::session::{AuthGate, LogoutOutcome};

use std::time::Duration;

use futures_util::future::join_all;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies concurrent refreshes share one outstanding status request.
///
/// **WHY THIS MATTERS**: Every button press triggers a status check. Without
/// coalescing a burst of presses becomes a burst of requests.
///
/// **BUG THIS CATCHES**: Would catch the in-flight flag being checked after the
/// request starts, or not checked at all.
#[tokio::test]
async fn given_slow_status_when_refreshed_concurrently_then_single_request() {
    // GIVEN: a status endpoint that answers slowly
    let server = MockServer::start().await;
    mount_delayed_status(&server, Duration::from_millis(200)).await;
    let (platform, _spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    // WHEN: five refreshes race
    let states = join_all((0..5).map(|_| session.refresh())).await;

    // THEN: one request reached the server, and its answer was cached
    assert_eq!(request_count(&server, STATUS_PATH).await, 1);
    assert_eq!(states.iter().filter(|s| s.is_connected()).count(), 1);
    assert!(session.current().await.is_connected());
}

/// **VALUE**: Verifies a broken status endpoint means "logged out", not a crash.
///
/// **BUG THIS CATCHES**: Would catch a server error leaving a previous
/// "connected" state cached (fail-open).
#[tokio::test]
async fn given_status_server_error_when_refreshed_then_unauthenticated() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let (platform, _spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);
    assert!(session.refresh().await.is_connected());

    server.reset().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let state = session.refresh().await;

    assert!(!state.is_connected());
    assert!(!session.current().await.is_connected());
}

#[tokio::test]
async fn given_connected_without_user_when_refreshed_then_fallback_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
        .mount(&server)
        .await;
    let (platform, _spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    let state = session.refresh().await;

    assert!(state.is_connected());
    assert_eq!(state.display_name(), Some("User"));
}

/// **VALUE**: Logged-out user who accepts the prompt is sent to login with an
/// auto-start intent recorded first.
///
/// **WHY THIS MATTERS**: The intent is what brings the camera back up after the
/// round-trip through the identity provider.
///
/// **BUG THIS CATCHES**: Would catch navigation before the intent is stored, or
/// the auto-start flag being lost.
#[tokio::test]
async fn given_logged_out_and_prompt_accepted_when_gated_then_redirects_with_intent() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    // WHEN
    let gate = session.require_authenticated(true).await;

    // THEN
    assert_eq!(gate, AuthGate::Redirecting);
    assert!(!gate.is_authenticated());
    assert_eq!(spies.navigator.targets(), vec![String::from("/login/")]);
    assert_eq!(spies.confirmation.prompt_count(), 1);

    let intent = session.intent_slot().take().expect("intent recorded");
    assert_eq!(intent.return_path(), "/");
    assert!(intent.auto_start_capture());
}

#[tokio::test]
async fn given_logged_out_and_prompt_declined_when_gated_then_stays_without_intent() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let (platform, spies) = spy_platform(false);
    let session = build_session(&test_config(&server), platform);

    let gate = session.require_authenticated(true).await;

    assert_eq!(gate, AuthGate::Declined);
    assert!(spies.navigator.targets().is_empty());
    assert!(!session.intent_slot().is_occupied());
}

#[tokio::test]
async fn given_logged_in_when_gated_then_authenticated_without_prompt() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let (platform, spies) = spy_platform(false);
    let session = build_session(&test_config(&server), platform);

    let gate = session.require_authenticated(false).await;

    assert!(gate.is_authenticated());
    assert_eq!(spies.confirmation.prompt_count(), 0);
}

/// **VALUE**: A second gated check while one runs is refused without a prompt.
///
/// **BUG THIS CATCHES**: Would catch two login dialogs stacking on a double click.
#[tokio::test]
async fn given_gate_running_when_gated_again_then_in_progress() {
    let server = MockServer::start().await;
    mount_delayed_status(&server, Duration::from_millis(200)).await;
    let (platform, _spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    let (first, second) = tokio::join!(
        session.require_authenticated(true),
        session.require_authenticated(true)
    );

    assert_eq!(first, AuthGate::Authenticated);
    assert_eq!(second, AuthGate::InProgress);
}

/// **VALUE**: Verifies the expiry path notifies, then navigates to login.
#[tokio::test]
async fn given_session_gone_when_quick_checked_then_notifies_and_redirects() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    let valid = session.quick_check().await;

    assert!(!valid);
    assert!(spies.notifier.contains(
        NotificationLevel::Error,
        "Session expired. Please login again."
    ));
    assert_eq!(spies.navigator.targets(), vec![String::from("/login/")]);
    assert_eq!(spies.confirmation.prompt_count(), 0);
}

/// **VALUE**: Logout without any CSRF token never reaches the network.
///
/// **WHY THIS MATTERS**: A request without the token is rejected server-side
/// anyway; sending it only leaks the session cookie for nothing.
///
/// **BUG THIS CATCHES**: Would catch the token lookup happening after the
/// request was built and sent.
#[tokio::test]
async fn given_no_csrf_token_when_logout_then_missing_token_and_no_request() {
    // GIVEN: no cookie, meta or form token
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;
    let mut config = test_config(&server);
    config.server.csrf_meta_token = None;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&config, platform);

    // WHEN
    let result = session.logout().await;

    // THEN
    assert!(matches!(result, Err(ApiError::MissingCsrfToken { .. })));
    assert_eq!(request_count(&server, LOGOUT_PATH).await, 0);
    assert!(spies.notifier.contains(
        NotificationLevel::Error,
        "Failed to logout: CSRF token not found"
    ));
    assert!(spies.navigator.targets().is_empty());
}

#[tokio::test]
async fn given_declined_confirmation_when_logout_then_cancelled_without_request() {
    let server = MockServer::start().await;
    let (platform, _spies) = spy_platform(false);
    let session = build_session(&test_config(&server), platform);

    let outcome = session.logout().await.expect("cancel is not an error");

    assert_eq!(outcome, LogoutOutcome::Cancelled);
    assert_eq!(request_count(&server, LOGOUT_PATH).await, 0);
}

/// **VALUE**: Successful logout clears per-tab state and returns to the root.
///
/// **BUG THIS CATCHES**: Would catch a stale return intent surviving logout and
/// auto-starting the camera for the next account.
#[tokio::test]
async fn given_confirmed_logout_when_server_agrees_then_state_cleared() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .and(header("X-CSRFToken", TEST_CSRF_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);
    session.refresh().await;
    session.begin_login().expect("login url");

    let outcome = session.logout().await.expect("logout");

    assert_eq!(outcome, LogoutOutcome::LoggedOut);
    assert!(!session.current().await.is_connected());
    assert!(!session.intent_slot().is_occupied());
    assert_eq!(spies.navigator.targets().last().map(String::as_str), Some("/"));
}

#[tokio::test]
async fn given_server_refuses_logout_when_logout_then_remote_rejected_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"success": false, "error": "db down"})),
        )
        .mount(&server)
        .await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    let err = session.logout().await.expect_err("should fail");

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.user_message(), "db down");
    assert!(spies.notifier.contains(NotificationLevel::Error, "Failed to logout: db down"));
}

/// **VALUE**: The `csrftoken` cookie wins over the page meta token.
///
/// **BUG THIS CATCHES**: Would catch the cookie jar not being consulted.
#[tokio::test]
async fn given_csrf_cookie_and_meta_when_logout_then_cookie_token_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .and(header("X-CSRFToken", "cookie-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let (platform, _spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);
    session.client().add_cookies("sessionid=s1; csrftoken=cookie-token");

    let outcome = session.logout().await.expect("logout");

    assert_eq!(outcome, LogoutOutcome::LoggedOut);
}

/// **VALUE**: Leaving for the identity provider from the capture page asks for
/// auto-start; from elsewhere it does not.
#[tokio::test]
async fn given_login_started_when_returning_then_intent_consumed_once_at_root() {
    // GIVEN: login started from the capture page
    let server = MockServer::start().await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);

    let url = session.begin_login().expect("authorize url");
    assert!(url.as_str().starts_with("https://accounts.spotify.com/authorize?"));
    assert_eq!(spies.navigator.targets(), vec![url.to_string()]);

    // WHEN: the callback lands on another page first
    spies.navigator.set_current("/callback/");
    let elsewhere = session.consume_return_intent();

    // THEN: nothing is consumed until the capture page
    assert!(elsewhere.is_none());
    assert!(session.intent_slot().is_occupied());

    spies.navigator.set_current("/");
    let intent = session.consume_return_intent().expect("intent at root");
    assert!(intent.auto_start_capture());
    assert!(session.consume_return_intent().is_none());
}

#[tokio::test]
async fn given_login_started_off_root_when_returning_then_no_auto_start() {
    let server = MockServer::start().await;
    let (platform, spies) = spy_platform(true);
    spies.navigator.set_current("/about/");
    let session = build_session(&test_config(&server), platform);

    session.begin_login().expect("authorize url");
    spies.navigator.set_current("/");

    assert!(session.consume_return_intent().is_none());
    assert!(!session.intent_slot().is_occupied());
}

/// **VALUE**: Login started from the login page keeps the gate's auto-start.
///
/// **WHY THIS MATTERS**: The gate sends users to `/login/` and they press the
/// login button there, so the path at that moment is never `/`.
///
/// **BUG THIS CATCHES**: Would catch `begin_login` overwriting the stored
/// intent and the camera not resuming after the OAuth round trip.
#[tokio::test]
async fn given_gate_redirected_to_login_page_when_login_begun_then_auto_start_kept() {
    // GIVEN: the gate recorded an auto-start intent and moved to /login/
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let (platform, spies) = spy_platform(true);
    let session = build_session(&test_config(&server), platform);
    assert_eq!(session.require_authenticated(true).await, AuthGate::Redirecting);
    spies.navigator.set_current("/login/");

    // WHEN
    session.begin_login().expect("authorize url");

    // THEN: back on the capture page the intent still asks to auto-start
    spies.navigator.set_current("/");
    let intent = session.consume_return_intent().expect("intent at root");
    assert!(intent.auto_start_capture());
    assert_eq!(intent.return_path(), "/login/");
}
