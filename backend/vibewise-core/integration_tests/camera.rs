use crate::helpers::{FakeCamera, OpenBehavior};

use vibewise_core::camera::{CaptureService, ResourceGuard, VideoConstraints};
use vibewise_core::config::CameraConfig;
use vibewise_core::error::CameraError;

use std::sync::Arc;

fn constraints() -> VideoConstraints {
    VideoConstraints::from(&CameraConfig::default())
}

/// **VALUE**: Verifies release stops every track and is idempotent.
///
/// **WHY THIS MATTERS**: A track left live keeps the camera light on after the
/// user is done, which is exactly what users notice and distrust.
///
/// **BUG THIS CATCHES**: Would catch release hiding the surface without
/// stopping tracks, or a second release double-decrementing.
#[tokio::test]
async fn given_acquired_camera_when_released_twice_then_no_tracks_and_second_is_noop() {
    // GIVEN
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let mut guard = ResourceGuard::new(camera.clone());
    let handle = guard.acquire(&constraints()).await.expect("acquire");
    assert_eq!(camera.tracks(), 1);
    assert!(guard.is_surface_visible());

    // WHEN
    let first = guard.release(&handle);
    let second = guard.release(&handle);

    // THEN
    assert!(first);
    assert!(!second);
    assert_eq!(camera.tracks(), 0);
    assert_eq!(guard.live_track_count(), 0);
    assert!(guard.active_handle().is_none());
    assert!(!guard.is_surface_visible());
}

/// **VALUE**: A second acquire while live reuses the stream.
///
/// **BUG THIS CATCHES**: Would catch a second device being opened and the first
/// stream leaking without anyone able to stop it.
#[tokio::test]
async fn given_live_camera_when_acquired_again_then_same_handle_and_single_open() {
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let mut guard = ResourceGuard::new(camera.clone());

    let first = guard.acquire(&constraints()).await.expect("acquire");
    let second = guard.acquire(&constraints()).await.expect("acquire");

    assert_eq!(first, second);
    assert_eq!(camera.opens(), 1);
    assert_eq!(camera.tracks(), 1);
}

#[tokio::test]
async fn given_denied_permission_when_acquired_then_nothing_retained() {
    let camera = Arc::new(FakeCamera::new(OpenBehavior::PermissionDenied));
    let mut guard = ResourceGuard::new(camera.clone());

    let err = guard.acquire(&constraints()).await.expect_err("should fail");

    assert!(matches!(err, CameraError::PermissionDenied { .. }));
    assert!(guard.active_handle().is_none());
    assert!(!guard.is_surface_visible());
}

#[tokio::test]
async fn given_guard_dropped_with_live_stream_then_tracks_stopped() {
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let mut guard = ResourceGuard::new(camera.clone());
    guard.acquire(&constraints()).await.expect("acquire");

    drop(guard);

    assert_eq!(camera.tracks(), 0);
}

/// **VALUE**: Verifies a capture yields an in-memory JPEG and a data URI.
///
/// **BUG THIS CATCHES**: Would catch the wrong codec or a missing data URI prefix,
/// both of which make the server reject the image.
#[tokio::test]
async fn given_live_stream_when_captured_then_jpeg_frame_in_memory() {
    // GIVEN
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let mut guard = ResourceGuard::new(camera);
    let handle = guard.acquire(&constraints()).await.expect("acquire");

    // WHEN
    let frame = CaptureService::new(80)
        .capture_frame(&guard, &handle)
        .expect("capture");

    // THEN
    assert_eq!(frame.mime_type(), "image/jpeg");
    assert_eq!(frame.dimensions(), (64, 48));
    assert_eq!(&frame.bytes()[..2], &[0xFF, 0xD8]);

    let debug = format!("{frame:?}");
    assert!(debug.contains("REDACTED"));
    assert!(!debug.contains("255, 216"));

    let uri = frame.into_data_uri();
    assert!(uri.starts_with("data:image/jpeg;base64,/9j/"));
}

/// **VALUE**: Capturing with a released handle is refused.
///
/// **BUG THIS CATCHES**: Would catch a stale handle reading from a newer stream.
#[tokio::test]
async fn given_released_handle_when_captured_then_capture_unready() {
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed));
    let mut guard = ResourceGuard::new(camera);
    let old = guard.acquire(&constraints()).await.expect("acquire");
    guard.release(&old);
    guard.acquire(&constraints()).await.expect("acquire");

    let err = CaptureService::new(80)
        .capture_frame(&guard, &old)
        .expect_err("should fail");

    assert!(matches!(err, CameraError::CaptureUnready { .. }));
}

#[tokio::test]
async fn given_stream_without_dimensions_when_captured_then_capture_unready() {
    let camera = Arc::new(FakeCamera::new(OpenBehavior::Succeed).without_dimensions());
    let mut guard = ResourceGuard::new(camera);
    let handle = guard.acquire(&constraints()).await.expect("acquire");

    let err = CaptureService::new(80)
        .capture_frame(&guard, &handle)
        .expect_err("should fail");

    assert!(matches!(err, CameraError::CaptureUnready { .. }));
    assert_eq!(
        err.user_message(),
        "Camera is not ready yet. Please wait a moment and try again."
    );
}
