// Unit tests for request/response bodies

use crate::api_client::wire::{
    DetectRequest, ErrorBody, PlaylistResponse, SAVE_CAPTURED_IMAGE, StatusResponse,
};

use serde_json::json;

/// **VALUE**: Verifies the classification body always says `save_image: false`.
///
/// **WHY THIS MATTERS**: Captured faces must never be stored server-side.
///
/// **BUG THIS CATCHES**: Would catch the flag being renamed or flipped.
#[test]
fn given_detect_request_when_serialized_then_save_image_is_false() {
    let body = serde_json::to_value(DetectRequest {
        image: "data:image/jpeg;base64,AAAA",
        save_image: SAVE_CAPTURED_IMAGE,
    })
    .expect("serialize");

    assert_eq!(
        body,
        json!({"image": "data:image/jpeg;base64,AAAA", "save_image": false})
    );
}

/// **VALUE**: Verifies a status body without `user` still parses.
///
/// **BUG THIS CATCHES**: Would catch a required `user` field turning every
/// logged-out response into an `AuthUnavailable`.
#[test]
fn given_status_without_user_when_parsed_then_connected_false() {
    let status: StatusResponse = serde_json::from_value(json!({"connected": false})).expect("parse");

    assert!(!status.connected);
    assert!(status.user.is_none());
}

#[test]
fn given_playlist_error_body_when_parsed_then_playlist_absent() {
    let body: PlaylistResponse =
        serde_json::from_value(json!({"error": "No Spotify token"})).expect("parse");

    assert!(body.playlist.is_none());
    assert_eq!(body.error.as_deref(), Some("No Spotify token"));
}

#[test]
fn given_error_body_when_error_empty_then_message_used() {
    let body = ErrorBody {
        error: Some(String::new()),
        message: Some(String::from("Registration failed")),
    };

    assert_eq!(body.into_message().as_deref(), Some("Registration failed"));
}
