//! A camera device backed by a single image file.
//!
//! Each `open` decodes the file afresh, so replacing the file between
//! captures changes what the next stream shows.

use vibewise_core::camera::{CameraDevice, MediaStream, VideoConstraints};
use vibewise_core::error::CameraError;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{ImageError, RgbImage};
use log::{debug, info};

pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CameraDevice for StillImageCamera {
    async fn open(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Box<dyn MediaStream>, CameraError> {
        debug!(
            "Opening still image {} (ideal {}x{}, facing {})",
            self.path.display(),
            constraints.ideal_width,
            constraints.ideal_height,
            constraints.facing_mode
        );

        let path = self.path.clone();
        let frame = tokio::task::spawn_blocking(move || decode_frame(&path))
            .await
            .map_err(|e| CameraError::device(format!("Image decoder task failed: {e}")))??;

        info!(
            "Still image stream opened at {}x{}",
            frame.width(),
            frame.height()
        );

        Ok(Box::new(StillImageStream::new(frame)))
    }
}

fn decode_frame(path: &Path) -> Result<RgbImage, CameraError> {
    match image::open(path) {
        Ok(decoded) => Ok(decoded.to_rgb8()),
        Err(ImageError::IoError(e)) => match e.kind() {
            ErrorKind::NotFound => Err(CameraError::device_not_found()),
            ErrorKind::PermissionDenied => Err(CameraError::permission_denied()),
            _ => Err(CameraError::device(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        },
        Err(e) => Err(CameraError::device(format!(
            "Failed to decode {}: {e}",
            path.display()
        ))),
    }
}

/// One video track that shows the same frame until stopped.
pub struct StillImageStream {
    frame: RgbImage,
    live: bool,
}

impl StillImageStream {
    pub fn new(frame: RgbImage) -> Self {
        Self { frame, live: true }
    }
}

impl MediaStream for StillImageStream {
    fn live_track_count(&self) -> usize {
        usize::from(self.live)
    }

    fn stop_all_tracks(&mut self) {
        self.live = false;
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        let (width, height) = self.frame.dimensions();
        (self.live && width > 0 && height > 0).then_some((width, height))
    }

    fn current_frame(&self) -> Result<RgbImage, CameraError> {
        if !self.live {
            return Err(CameraError::capture_unready("Camera stream has been stopped"));
        }
        Ok(self.frame.clone())
    }
}
