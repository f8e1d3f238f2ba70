// Unit tests for the still-image camera device

use crate::still_camera::{StillImageCamera, StillImageStream};

use vibewise_core::camera::{CameraDevice, MediaStream, VideoConstraints};
use vibewise_core::config::CameraConfig;
use vibewise_core::error::CameraError;

use image::{Rgb, RgbImage};

fn constraints() -> VideoConstraints {
    VideoConstraints::from(&CameraConfig::default())
}

#[tokio::test]
async fn given_png_file_when_opened_then_one_live_track_at_native_size() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("face.png");
    RgbImage::from_pixel(32, 24, Rgb([200, 120, 80]))
        .save(&path)
        .unwrap();

    // WHEN
    let stream = StillImageCamera::new(&path)
        .open(&constraints())
        .await
        .expect("opened");

    // THEN
    assert_eq!(stream.live_track_count(), 1);
    assert_eq!(stream.video_dimensions(), Some((32, 24)));
    assert_eq!(stream.current_frame().unwrap().get_pixel(0, 0), &Rgb([200, 120, 80]));
}

/// **VALUE**: A missing frame file reads as "no camera".
///
/// **WHY THIS MATTERS**: The user sees the same message a browser shows when
/// no device is plugged in, instead of an I/O error string.
#[tokio::test]
async fn given_missing_file_when_opened_then_device_not_found() {
    let dir = tempfile::tempdir().unwrap();

    let result = StillImageCamera::new(dir.path().join("nope.jpg"))
        .open(&constraints())
        .await;

    assert!(matches!(result, Err(CameraError::DeviceNotFound { .. })));
}

#[tokio::test]
async fn given_garbage_file_when_opened_then_device_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"not an image").unwrap();

    let result = StillImageCamera::new(&path).open(&constraints()).await;

    assert!(matches!(result, Err(CameraError::Device { .. })));
}

/// **VALUE**: A stopped stream stops serving frames.
///
/// **BUG THIS CATCHES**: Would catch capture still succeeding after release,
/// which would hide a missing release in the orchestrator.
#[test]
fn given_stopped_stream_when_read_then_no_tracks_no_dimensions_no_frame() {
    let mut stream = StillImageStream::new(RgbImage::new(8, 8));

    stream.stop_all_tracks();
    stream.stop_all_tracks();

    assert_eq!(stream.live_track_count(), 0);
    assert_eq!(stream.video_dimensions(), None);
    assert!(matches!(
        stream.current_frame(),
        Err(CameraError::CaptureUnready { .. })
    ));
}
