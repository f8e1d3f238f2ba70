//! The capture workflow: gate → acquire → capture → classify → release →
//! (optional) playlist.
//!
//! [`DetectionOrchestrator`] is a plain state machine driven through `&mut self`.
//! [`OrchestratorHandle`] wraps it in an actor so several callers can share it.
//!
//! Every path out of a capture phase releases the camera before the state
//! changes, and before any redirect.

mod handle;
pub mod state;

pub use handle::OrchestratorHandle;
pub use state::{DetectOutcome, DetectionState, PlaylistOutcome, StartOutcome};

use crate::LOGIN_PATH;
use crate::camera::{
    CameraDevice, CameraHandle, CaptureService, CapturedFrame, ResourceGuard, VideoConstraints,
};
use crate::config::CameraConfig;
use crate::error::api::ApiError;
use crate::session::{AuthGate, LogoutOutcome, SessionCache};

use models::DetectionResult;

use std::sync::Arc;

use log::{debug, info, warn};

pub const CAMERA_STARTED_MESSAGE: &str = "Camera started successfully!";
pub const CAMERA_STOPPED_MESSAGE: &str = "Camera stopped";
pub const MOOD_DETECTED_MESSAGE: &str = "Mood detected! Camera stopped.";
pub const PLAYLIST_PENDING_MESSAGE: &str = "Creating your personalized playlist...";
pub const PLAYLIST_CREATED_MESSAGE: &str = "Playlist created successfully!";

/// A frame on its way to the classifier, tagged with the epoch it was taken in.
pub(crate) struct PendingClassification {
    pub(crate) epoch: u64,
    pub(crate) frame: CapturedFrame,
}

pub struct DetectionOrchestrator {
    session: SessionCache,
    guard: ResourceGuard,
    capture: CaptureService,
    constraints: VideoConstraints,
    state: DetectionState,
    handle: Option<CameraHandle>,
    /// Bumped whenever in-flight work must be forgotten.
    epoch: u64,
}

impl DetectionOrchestrator {
    pub fn new(
        session: SessionCache,
        device: Arc<dyn CameraDevice>,
        camera_config: &CameraConfig,
    ) -> Self {
        Self {
            session,
            guard: ResourceGuard::new(device),
            capture: CaptureService::new(camera_config.jpeg_quality),
            constraints: VideoConstraints::from(camera_config),
            state: DetectionState::Idle,
            handle: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> &DetectionState {
        &self.state
    }

    pub fn session(&self) -> &SessionCache {
        &self.session
    }

    pub fn resources(&self) -> &ResourceGuard {
        &self.guard
    }

    /// Checks login, then opens the camera.
    pub async fn start(&mut self) -> StartOutcome {
        if !self.state.accepts_start() {
            debug!("Start ignored while {}", self.state);
            return StartOutcome::Ignored;
        }

        let previous = std::mem::replace(&mut self.state, DetectionState::AuthChecking);

        match self.session.require_authenticated(true).await {
            AuthGate::Authenticated => {}
            AuthGate::Redirecting => {
                self.state = DetectionState::Redirecting(LOGIN_PATH.to_string());
                return StartOutcome::Redirecting;
            }
            AuthGate::Declined => {
                self.state = DetectionState::Idle;
                return StartOutcome::Declined;
            }
            AuthGate::InProgress => {
                self.state = previous;
                return StartOutcome::Ignored;
            }
        }

        self.state = DetectionState::CameraStarting;

        match self.guard.acquire(&self.constraints).await {
            Ok(handle) => {
                self.handle = Some(handle.clone());
                self.state = DetectionState::CameraReady;
                self.session.platform().success(CAMERA_STARTED_MESSAGE);
                StartOutcome::CameraReady(handle)
            }
            Err(e) => {
                let message = e.user_message();
                self.handle = None;
                self.state = DetectionState::Error(message.clone());
                self.session.platform().error(&message);
                StartOutcome::Failed { message }
            }
        }
    }

    /// Captures one frame and classifies it. The camera is released whatever
    /// the outcome.
    pub async fn detect(&mut self) -> DetectOutcome {
        let pending = match self.begin_detect().await {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };

        let result = self.session.client().detect_mood(pending.frame).await;
        self.complete_detect(pending.epoch, result).await
    }

    /// Everything up to the classification request: session re-check and
    /// frame capture.
    pub(crate) async fn begin_detect(&mut self) -> Result<PendingClassification, DetectOutcome> {
        if self.state != DetectionState::CameraReady {
            debug!("Detect ignored while {}", self.state);
            return Err(DetectOutcome::Ignored);
        }

        let Some(handle) = self.handle.clone() else {
            warn!("Camera ready without a handle, resetting");
            self.state = DetectionState::Idle;
            return Err(DetectOutcome::Ignored);
        };

        self.state = DetectionState::Detecting;

        if !self.session.is_session_valid().await {
            self.redirect_to_login().await;
            return Err(DetectOutcome::Redirecting);
        }

        let frame = match self.capture.capture_frame(&self.guard, &handle) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed ({}): {}", e.error_category(), e);
                self.release_camera();
                let message = e.user_message();
                self.state = DetectionState::Error(message.clone());
                self.session.platform().error(&message);
                return Err(DetectOutcome::Failed { message });
            }
        };

        self.state = DetectionState::Classifying;

        Ok(PendingClassification {
            epoch: self.epoch,
            frame,
        })
    }

    /// Applies a classification answer. Answers from an older epoch, or that
    /// arrive after the workflow left `Classifying`, are dropped.
    pub(crate) async fn complete_detect(
        &mut self,
        epoch: u64,
        result: Result<DetectionResult, ApiError>,
    ) -> DetectOutcome {
        if epoch != self.epoch || self.state != DetectionState::Classifying {
            info!(
                "Discarding classification from epoch {} (current {}, {})",
                epoch, self.epoch, self.state
            );
            return DetectOutcome::Discarded;
        }

        match result {
            Ok(detected) => {
                self.release_camera();
                self.state = DetectionState::Result(detected.clone());
                self.session.platform().success(MOOD_DETECTED_MESSAGE);
                DetectOutcome::Detected(detected)
            }
            Err(e) if e.is_session_expired() => {
                self.redirect_to_login().await;
                DetectOutcome::Redirecting
            }
            Err(e) => {
                warn!("Classification failed ({}): {}", e.error_category(), e);
                self.release_camera();
                let message = format!("Error: {}", e.user_message());
                self.state = DetectionState::Error(message.clone());
                self.session.platform().error(&message);
                DetectOutcome::Failed { message }
            }
        }
    }

    /// Releases the camera and forgets any classification in flight.
    ///
    /// Returns `true` if a live stream was stopped.
    pub fn stop(&mut self) -> bool {
        let released = self.release_camera();
        self.epoch += 1;

        if self.state.is_capture_phase() {
            self.state = DetectionState::Idle;
        }

        if released {
            self.session.platform().info(CAMERA_STOPPED_MESSAGE);
        }

        released
    }

    /// Builds a playlist from the current result's mood label, unchanged.
    pub async fn create_playlist(&mut self) -> PlaylistOutcome {
        let DetectionState::Result(detected) = &self.state else {
            debug!("Playlist ignored while {}", self.state);
            return PlaylistOutcome::Ignored;
        };
        let mood = detected.mood().to_string();

        self.session.platform().info(PLAYLIST_PENDING_MESSAGE);

        match self.session.client().create_playlist(&mood).await {
            Ok(playlist) => {
                self.session.platform().success(PLAYLIST_CREATED_MESSAGE);
                PlaylistOutcome::Created(playlist)
            }
            Err(e) if e.is_session_expired() => {
                self.redirect_to_login().await;
                PlaylistOutcome::Redirecting
            }
            Err(e) => {
                warn!("Playlist creation failed ({}): {}", e.error_category(), e);
                let message = format!("Failed to create playlist: {}", e.user_message());
                self.session.platform().error(&message);
                PlaylistOutcome::Failed { message }
            }
        }
    }

    /// Auto-starts capture when the user just came back from logging in.
    ///
    /// Returns `None` when there was nothing to resume.
    pub async fn resume_after_login(&mut self) -> Option<StartOutcome> {
        let intent = self.session.consume_return_intent()?;
        info!(
            "Resuming capture after login (returned to {})",
            intent.return_path()
        );

        tokio::time::sleep(self.session.session_config().auto_start_delay()).await;
        Some(self.start().await)
    }

    /// Confirms, ends the session, then releases the camera.
    ///
    /// A refused or unsendable logout leaves the camera and state untouched.
    pub async fn logout(&mut self) -> Result<LogoutOutcome, ApiError> {
        let confirmed = self
            .session
            .platform()
            .confirmation
            .confirm(crate::session::LOGOUT_PROMPT)
            .await;

        if !confirmed {
            info!("Logout cancelled");
            return Ok(LogoutOutcome::Cancelled);
        }

        let outcome = self.session.end_session().await?;

        self.release_camera();
        self.epoch += 1;
        if self.state.is_capture_phase() {
            self.state = DetectionState::Idle;
        }

        Ok(outcome)
    }

    fn release_camera(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => self.guard.release(&handle),
            None => self.guard.release_active(),
        }
    }

    async fn redirect_to_login(&mut self) {
        self.release_camera();
        self.epoch += 1;
        self.state = DetectionState::Redirecting(LOGIN_PATH.to_string());
        self.session.signal_session_expired().await;
    }
}
