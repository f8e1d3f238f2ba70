//! Camera ownership and single-frame capture.
//!
//! [`ResourceGuard`] is the only place a camera stream is opened or stopped.
//! [`CaptureService`] borrows the live stream through the guard to take one
//! still frame, which is handed off as an in-memory [`CapturedFrame`].

pub mod capture;
pub mod device;
pub mod guard;

pub use capture::{CaptureService, CapturedFrame};
pub use device::{CameraDevice, MediaStream, VideoConstraints};
pub use guard::{CameraHandle, ResourceGuard};
