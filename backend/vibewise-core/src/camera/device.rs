use crate::config::CameraConfig;
use crate::error::camera::CameraError;

use async_trait::async_trait;
use image::RgbImage;

/// Preferred video settings. The device may pick something else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing_mode: String,
}

impl From<&CameraConfig> for VideoConstraints {
    fn from(config: &CameraConfig) -> Self {
        Self {
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
            facing_mode: config.facing_mode.clone(),
        }
    }
}

/// A video input that can be opened on request. Audio is never requested.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Opens a video-only stream. May suspend on a permission prompt.
    ///
    /// # Errors
    ///
    /// [`CameraError::PermissionDenied`] when the user refuses,
    /// [`CameraError::DeviceNotFound`] when no device exists,
    /// [`CameraError::Device`] for anything else.
    async fn open(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, CameraError>;
}

/// An open stream. Tracks stay live until [`MediaStream::stop_all_tracks`].
pub trait MediaStream: Send + Sync {
    fn live_track_count(&self) -> usize;

    fn stop_all_tracks(&mut self);

    /// Native frame size, or `None` before the first frame has arrived.
    fn video_dimensions(&self) -> Option<(u32, u32)>;

    /// Current frame at native resolution.
    fn current_frame(&self) -> Result<RgbImage, CameraError>;
}
