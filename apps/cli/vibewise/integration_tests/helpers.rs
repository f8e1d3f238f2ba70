//! Test helpers for the terminal client.
//!
//! A `Repl` wired to a wiremock server, a still-image camera on a temp file
//! and console input fed from a fixed script of answers.

use vibewise::console::{ConsoleConfirmation, ConsoleInput, ConsoleNavigator, ConsoleNotifier};
use vibewise::repl::Repl;
use vibewise::still_camera::StillImageCamera;

use vibewise_core::ROOT_PATH;
use vibewise_core::api_client::VibewiseClient;
use vibewise_core::config::ClientConfig;
use vibewise_core::platform::Platform;
use vibewise_core::session::SessionCache;

use std::sync::Arc;

use image::{Rgb, RgbImage};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATUS_PATH: &str = "/api/spotify/status/";
pub const DETECT_PATH: &str = "/api/mood/detect/";
pub const PLAYLIST_PATH: &str = "/api/spotify/create_playlist/";

pub struct TestPage {
    pub repl: Repl,
    pub navigator: Arc<ConsoleNavigator>,
    _frame_dir: TempDir,
}

/// `answers` is what the user types at confirmation prompts, one per line.
pub fn build_page(server: &MockServer, answers: &'static str) -> TestPage {
    let mut config = ClientConfig::default();
    config.server.base_url = server.uri();
    config.server.request_timeout_secs = 5;
    config.server.csrf_meta_token = Some(String::from("meta-token-123"));
    config.session.redirect_delay_ms = 0;
    config.session.auto_start_delay_ms = 0;

    let frame_dir = tempfile::tempdir().unwrap();
    let frame_path = frame_dir.path().join("frame.png");
    RgbImage::from_pixel(32, 24, Rgb([180, 140, 100]))
        .save(&frame_path)
        .unwrap();

    let input = Arc::new(ConsoleInput::new(Box::new(answers.as_bytes())));
    let navigator = Arc::new(ConsoleNavigator::new(ROOT_PATH));
    let platform = Platform::new(
        Arc::new(ConsoleConfirmation::new(input)),
        navigator.clone(),
        Arc::new(ConsoleNotifier),
    );

    let client = VibewiseClient::new(&config.server).expect("client");
    let session = SessionCache::new(client, platform, &config);
    let repl = Repl::new(
        session,
        navigator.clone(),
        Arc::new(StillImageCamera::new(frame_path)),
        config.camera.clone(),
    );

    TestPage {
        repl,
        navigator,
        _frame_dir: frame_dir,
    }
}

pub async fn mount_status(server: &MockServer, connected: bool) {
    let body = if connected {
        json!({"connected": true, "user": {"name": "Ada"}})
    } else {
        json!({"connected": false})
    };

    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_detect(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"mood": "happy", "confidence": 0.87})),
        )
        .mount(server)
        .await;
}
