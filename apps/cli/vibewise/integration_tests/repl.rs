use crate::helpers::{PLAYLIST_PATH, STATUS_PATH, build_page, mount_detect, mount_status};

use vibewise::repl::{Command, Reply};

use vibewise_core::orchestrator::DetectionState;
use vibewise_core::platform::Navigator;

use common::RedactedToken;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text(reply: Reply) -> String {
    match reply {
        Reply::Text(text) => text,
        other => panic!("expected text reply, got {other:?}"),
    }
}

/// **VALUE**: The happy path from the terminal: start, detect, playlist.
///
/// **WHY THIS MATTERS**: This is the whole product. Every layer (still camera,
/// JPEG encoding, API client, orchestrator actor) is on the path.
///
/// **BUG THIS CATCHES**: Would catch the still camera not producing a frame
/// the capture service accepts, or the command loop skipping a step.
#[tokio::test]
async fn given_logged_in_user_when_start_detect_playlist_then_playlist_link_shown() {
    // GIVEN
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    mount_detect(&server).await;
    Mock::given(method("POST"))
        .and(path(PLAYLIST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlist": {"name": "Happy Vibes"},
            "spotify_url": "https://open.spotify.com/playlist/abc",
            "genres_used": ["pop"]
        })))
        .mount(&server)
        .await;
    let mut page = build_page(&server, "");

    // WHEN
    let started = text(page.repl.execute(Command::Start).await.expect("start"));
    let detected = text(page.repl.execute(Command::Detect).await.expect("detect"));
    let playlist = text(page.repl.execute(Command::Playlist).await.expect("playlist"));

    // THEN
    assert!(started.starts_with("Camera is on."));
    assert!(detected.starts_with("Mood: 😊 Happy (87.0%)."));
    assert!(playlist.contains("Happy Vibes"));
    assert!(playlist.ends_with("https://open.spotify.com/playlist/abc"));
}

/// **VALUE**: The full login round trip resumes the camera on its own.
///
/// **WHY THIS MATTERS**: After pressing start while logged out, the user
/// expects to land back with the camera on, not to press start again.
///
/// **BUG THIS CATCHES**: Would catch the redirected page never being
/// reloaded, or `login` from the login page dropping the auto-start request.
#[tokio::test]
async fn given_logged_out_user_when_login_completed_then_camera_auto_starts() {
    // GIVEN: logged out, and the user accepts the login prompt
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let mut page = build_page(&server, "y\n");

    // WHEN: start redirects to the login page
    let started = text(page.repl.execute(Command::Start).await.expect("start"));
    assert_eq!(started, "Login required. Type `login` to continue.");
    assert_eq!(page.navigator.current_path(), "/login/");
    assert!(page.repl.handle().state().await.expect("alive").is_redirecting());

    // AND: login hands out the authorize address
    assert_eq!(
        page.repl.execute(Command::Login).await.expect("login"),
        Reply::Silent
    );
    assert!(
        page.navigator
            .last_target()
            .is_some_and(|t| t.starts_with("https://accounts.spotify.com/authorize?"))
    );

    // AND: the browser finishes and the cookie is pasted back
    server.reset().await;
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .and(header("cookie", "sessionid=fresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connected": true, "user": {"name": "Ada"}})),
        )
        .mount(&server)
        .await;
    let resumed = page
        .repl
        .execute(Command::Cookie(RedactedToken::new("sessionid=fresh")))
        .await
        .expect("cookie");

    // THEN: back on the capture page with the camera running
    assert_eq!(page.navigator.current_path(), "/");
    assert!(text(resumed).starts_with("Camera is on."));
    assert_eq!(
        page.repl.handle().state().await.expect("alive"),
        DetectionState::CameraReady
    );
}

#[tokio::test]
async fn given_declined_login_prompt_when_started_then_camera_stays_off() {
    let server = MockServer::start().await;
    mount_status(&server, false).await;
    let mut page = build_page(&server, "n\n");

    let started = text(page.repl.execute(Command::Start).await.expect("start"));

    assert_eq!(started, "Login declined. The camera stays off.");
    assert_eq!(page.navigator.current_path(), "/");
    assert_eq!(
        page.repl.handle().state().await.expect("alive"),
        DetectionState::Idle
    );
}

#[tokio::test]
async fn given_status_command_when_logged_in_then_name_shown() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let mut page = build_page(&server, "");

    let reply = text(page.repl.execute(Command::Status).await.expect("status"));

    assert_eq!(reply, "Logged in as Ada.");
}

#[tokio::test]
async fn given_idle_page_when_stopped_or_detected_then_nothing_happens() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let mut page = build_page(&server, "");

    let stopped = text(page.repl.execute(Command::Stop).await.expect("stop"));
    let detected = text(page.repl.execute(Command::Detect).await.expect("detect"));

    assert_eq!(stopped, "The camera is not running.");
    assert_eq!(detected, "Start the camera first.");
}

#[tokio::test]
async fn given_quit_when_camera_live_then_released_and_loop_ends() {
    let server = MockServer::start().await;
    mount_status(&server, true).await;
    let mut page = build_page(&server, "");
    page.repl.execute(Command::Start).await.expect("start");

    let reply = page.repl.execute(Command::Quit).await.expect("quit");

    assert_eq!(reply, Reply::Quit);
    assert_eq!(
        page.repl.handle().state().await.expect("alive"),
        DetectionState::Idle
    );
}
