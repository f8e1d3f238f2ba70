use crate::PlaylistInfo;

use serde_json::json;

/// **VALUE**: Verifies the summary line prefers the server message.
///
/// **BUG THIS CATCHES**: Would catch genres overriding a curated message.
#[test]
fn given_message_when_summarising_then_returns_message() {
    let info: PlaylistInfo = serde_json::from_value(json!({
        "playlist": {"name": "Happy Vibes"},
        "spotify_url": "https://open.spotify.com/playlist/abc",
        "genres_used": ["pop"],
        "message": "Built from your top artists"
    }))
    .unwrap();

    assert_eq!(info.summary(), "Built from your top artists");
}

#[test]
fn given_genres_without_message_when_summarising_then_lists_genres() {
    let info: PlaylistInfo = serde_json::from_value(json!({
        "playlist": {"name": "Happy Vibes"},
        "spotify_url": "https://open.spotify.com/playlist/abc",
        "genres_used": ["pop", "dance"]
    }))
    .unwrap();

    assert_eq!(info.summary(), "Based on pop, dance");
}

/// **VALUE**: Verifies optional fields may be absent from the response.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` turning a
/// successful playlist creation into a JSON error.
#[test]
fn given_minimal_response_when_deserialised_then_falls_back_to_favorites() {
    let info: PlaylistInfo = serde_json::from_value(json!({
        "playlist": {"name": "Chill"},
        "spotify_url": "https://open.spotify.com/playlist/xyz"
    }))
    .unwrap();

    assert_eq!(info.playlist.name, "Chill");
    assert_eq!(info.summary(), "Based on your favorites");
}
