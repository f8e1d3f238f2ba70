use crate::camera::device::{CameraDevice, MediaStream, VideoConstraints};
use crate::error::camera::CameraError;

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

/// Proof of ownership of the live camera stream.
///
/// Only [`ResourceGuard`] mints handles. A handle whose stream has been
/// released is inert: releasing or capturing with it does nothing.
#[derive(Clone, PartialEq, Eq)]
pub struct CameraHandle {
    id: Uuid,
}

impl CameraHandle {
    fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CameraHandle({})", self.id)
    }
}

struct ActiveStream {
    handle: CameraHandle,
    stream: Box<dyn MediaStream>,
}

/// Owns at most one open camera stream and the visibility of the surface
/// that displays it.
pub struct ResourceGuard {
    device: Arc<dyn CameraDevice>,
    active: Option<ActiveStream>,
    surface_visible: bool,
}

impl ResourceGuard {
    pub fn new(device: Arc<dyn CameraDevice>) -> Self {
        Self {
            device,
            active: None,
            surface_visible: false,
        }
    }

    /// Opens the camera and shows the capture surface.
    ///
    /// While a stream is live no second device is opened; the live handle
    /// is returned instead.
    ///
    /// # Errors
    ///
    /// Propagates the device's [`CameraError`]. Nothing is retained on failure.
    pub async fn acquire(
        &mut self,
        constraints: &VideoConstraints,
    ) -> Result<CameraHandle, CameraError> {
        if let Some(active) = &self.active {
            warn!(
                "Camera already acquired as {:?}, returning live handle",
                active.handle
            );
            return Ok(active.handle.clone());
        }

        debug!(
            "Opening camera: ideal {}x{}, facing {}",
            constraints.ideal_width, constraints.ideal_height, constraints.facing_mode
        );

        let stream = self.device.open(constraints).await.map_err(|e| {
            warn!("Camera acquisition failed ({}): {}", e.error_category(), e);
            e
        })?;

        let handle = CameraHandle::new();
        info!(
            "Camera acquired as {:?} with {} live track(s)",
            handle,
            stream.live_track_count()
        );

        self.active = Some(ActiveStream {
            handle: handle.clone(),
            stream,
        });
        self.surface_visible = true;

        Ok(handle)
    }

    /// Stops every track of the stream owned by `handle` and hides the surface.
    ///
    /// Returns `false` without side effects when `handle` is not the live one.
    pub fn release(&mut self, handle: &CameraHandle) -> bool {
        match &self.active {
            Some(active) if active.handle == *handle => self.release_active(),
            _ => {
                debug!("Release of {:?} ignored, not the live handle", handle);
                false
            }
        }
    }

    /// Releases whatever stream is live. Returns `false` if none was.
    pub fn release_active(&mut self) -> bool {
        self.surface_visible = false;

        match self.active.take() {
            Some(mut active) => {
                active.stream.stop_all_tracks();
                info!("Camera released: {:?}", active.handle);
                true
            }
            None => false,
        }
    }

    pub fn active_handle(&self) -> Option<&CameraHandle> {
        self.active.as_ref().map(|a| &a.handle)
    }

    pub fn is_surface_visible(&self) -> bool {
        self.surface_visible
    }

    pub fn live_track_count(&self) -> usize {
        self.active
            .as_ref()
            .map_or(0, |a| a.stream.live_track_count())
    }

    pub(crate) fn stream_for(&self, handle: &CameraHandle) -> Option<&dyn MediaStream> {
        self.active
            .as_ref()
            .filter(|a| a.handle == *handle)
            .map(|a| a.stream.as_ref())
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        if self.active.is_some() {
            warn!("ResourceGuard dropped with a live camera stream, releasing");
            self.release_active();
        }
    }
}
