//! Test helpers for vibewise-core integration tests.
//!
//! - A fake camera device whose live tracks are observable from the test
//! - Spy implementations of the platform capabilities
//! - A config pointing at a wiremock server, with delays zeroed
//! - Status endpoint mounting

use vibewise_core::api_client::VibewiseClient;
use vibewise_core::camera::{
    CameraDevice, CaptureService, CapturedFrame, MediaStream, ResourceGuard, VideoConstraints,
};
use vibewise_core::config::ClientConfig;
use vibewise_core::error::CameraError;
use vibewise_core::orchestrator::DetectionOrchestrator;
use vibewise_core::platform::{Confirmation, Navigator, NotificationLevel, NotificationSink, Platform};
use vibewise_core::session::SessionCache;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const STATUS_PATH: &str = "/api/spotify/status/";
pub const LOGOUT_PATH: &str = "/api/spotify/logout/";
pub const DETECT_PATH: &str = "/api/mood/detect/";
pub const PLAYLIST_PATH: &str = "/api/spotify/create_playlist/";

pub const TEST_CSRF_TOKEN: &str = "meta-token-123";

// ============================================
// FAKE CAMERA
// ============================================

#[derive(Debug, Clone, Copy)]
pub enum OpenBehavior {
    Succeed,
    PermissionDenied,
    NotFound,
}

pub struct FakeCamera {
    behavior: OpenBehavior,
    dimensions: Option<(u32, u32)>,
    pub open_count: Arc<AtomicUsize>,
    pub live_tracks: Arc<AtomicUsize>,
}

impl FakeCamera {
    pub fn new(behavior: OpenBehavior) -> Self {
        Self {
            behavior,
            dimensions: Some((64, 48)),
            open_count: Arc::new(AtomicUsize::new(0)),
            live_tracks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stream that never reports dimensions.
    pub fn without_dimensions(mut self) -> Self {
        self.dimensions = None;
        self
    }

    pub fn opens(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }

    pub fn tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(
        &self,
        _constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, CameraError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            OpenBehavior::Succeed => {
                self.live_tracks.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(FakeStream {
                    live_tracks: Arc::clone(&self.live_tracks),
                    stopped: false,
                    dimensions: self.dimensions,
                }))
            }
            OpenBehavior::PermissionDenied => Err(CameraError::permission_denied()),
            OpenBehavior::NotFound => Err(CameraError::device_not_found()),
        }
    }
}

pub struct FakeStream {
    live_tracks: Arc<AtomicUsize>,
    stopped: bool,
    dimensions: Option<(u32, u32)>,
}

impl MediaStream for FakeStream {
    fn live_track_count(&self) -> usize {
        if self.stopped { 0 } else { 1 }
    }

    fn stop_all_tracks(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live_tracks.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn current_frame(&self) -> Result<RgbImage, CameraError> {
        let (width, height) = self
            .dimensions
            .ok_or_else(|| CameraError::capture_unready("no frame yet"))?;
        Ok(RgbImage::from_pixel(width, height, Rgb([200, 120, 40])))
    }
}

// ============================================
// PLATFORM SPIES
// ============================================

#[derive(Default)]
pub struct SpyNotifier {
    messages: Mutex<Vec<(NotificationLevel, String)>>,
}

impl SpyNotifier {
    pub fn messages(&self) -> Vec<(NotificationLevel, String)> {
        self.messages.lock().expect("lock").clone()
    }

    pub fn contains(&self, level: NotificationLevel, text: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| *l == level && m.contains(text))
    }
}

impl NotificationSink for SpyNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.messages
            .lock()
            .expect("lock")
            .push((level, message.to_string()));
    }
}

pub struct SpyNavigator {
    current: Mutex<String>,
    targets: Mutex<Vec<String>>,
}

impl SpyNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().expect("lock").clone()
    }

    pub fn set_current(&self, path: &str) {
        *self.current.lock().expect("lock") = path.to_string();
    }
}

impl Navigator for SpyNavigator {
    fn current_path(&self) -> String {
        self.current.lock().expect("lock").clone()
    }

    fn navigate(&self, target: &str) {
        self.targets.lock().expect("lock").push(target.to_string());
    }
}

pub struct ScriptedConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().expect("lock").len()
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        self.prompts.lock().expect("lock").push(message.to_string());
        self.answer
    }
}

pub struct Spies {
    pub notifier: Arc<SpyNotifier>,
    pub navigator: Arc<SpyNavigator>,
    pub confirmation: Arc<ScriptedConfirmation>,
}

/// Platform at the site root whose confirmation always answers `confirm`.
pub fn spy_platform(confirm: bool) -> (Platform, Spies) {
    let notifier = Arc::new(SpyNotifier::default());
    let navigator = Arc::new(SpyNavigator::at("/"));
    let confirmation = Arc::new(ScriptedConfirmation::answering(confirm));

    let platform = Platform::new(
        Arc::clone(&confirmation) as Arc<dyn Confirmation>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
        Arc::clone(&notifier) as Arc<dyn NotificationSink>,
    );

    (
        platform,
        Spies {
            notifier,
            navigator,
            confirmation,
        },
    )
}

// ============================================
// SERVER
// ============================================

/// Config for `server` with every delay set to zero and a page CSRF token.
pub fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.server.base_url = server.uri();
    config.server.request_timeout_secs = 5;
    config.server.csrf_meta_token = Some(TEST_CSRF_TOKEN.to_string());
    config.session.redirect_delay_ms = 0;
    config.session.auto_start_delay_ms = 0;
    config
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

pub async fn mount_delayed_status(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"connected": true, "user": {"name": "Ada"}}))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Number of requests the server saw on `request_path`.
pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

// ============================================
// WIRING
// ============================================

pub fn build_session(config: &ClientConfig, platform: Platform) -> SessionCache {
    let client = VibewiseClient::new(&config.server).expect("Failed to build client");
    SessionCache::new(client, platform, config)
}

pub fn build_orchestrator(
    config: &ClientConfig,
    platform: Platform,
    camera: Arc<FakeCamera>,
) -> DetectionOrchestrator {
    DetectionOrchestrator::new(build_session(config, platform), camera, &config.camera)
}

/// One real JPEG frame taken through the guard, with the guard released after.
pub async fn capture_test_frame() -> CapturedFrame {
    let mut guard = ResourceGuard::new(Arc::new(FakeCamera::new(OpenBehavior::Succeed)));
    let constraints = VideoConstraints::from(&ClientConfig::default().camera);
    let handle = guard.acquire(&constraints).await.expect("acquire");

    let frame = CaptureService::new(80)
        .capture_frame(&guard, &handle)
        .expect("capture");
    guard.release(&handle);
    frame
}
