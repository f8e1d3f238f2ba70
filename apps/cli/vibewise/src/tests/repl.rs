// Unit tests for command parsing and outcome rendering

use crate::error::VibewiseError;
use crate::repl::{Command, describe_detect, describe_playlist, describe_start};

use models::{DetectionResult, PlaylistInfo, PlaylistSummary};

use vibewise_core::orchestrator::{DetectOutcome, PlaylistOutcome, StartOutcome};

#[test]
fn given_command_words_when_parsed_then_matching_commands() {
    assert_eq!("start".parse::<Command>().unwrap(), Command::Start);
    assert_eq!("  DETECT ".parse::<Command>().unwrap(), Command::Detect);
    assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
}

/// **VALUE**: The pasted cookie keeps everything after the first word.
///
/// **BUG THIS CATCHES**: Would catch splitting on every space, which cuts a
/// `sessionid=...; csrftoken=...` header in half.
#[test]
fn given_cookie_with_spaces_when_parsed_then_whole_header_kept() {
    let command = "cookie sessionid=abc; csrftoken=xyz"
        .parse::<Command>()
        .unwrap();

    match command {
        Command::Cookie(header) => assert_eq!(header.as_str(), "sessionid=abc; csrftoken=xyz"),
        other => panic!("expected Cookie, got {other:?}"),
    }
}

/// **VALUE**: A parsed cookie never shows up in debug logs.
///
/// **BUG THIS CATCHES**: Would catch `Command` holding a plain `String`,
/// which the command loop logs with `{:?}`.
#[test]
fn given_cookie_command_when_debug_formatted_then_value_hidden() {
    let command = "cookie sessionid=abc".parse::<Command>().unwrap();

    let debug = format!("{command:?}");

    assert!(!debug.contains("abc"));
}

#[test]
fn given_unknown_or_incomplete_words_when_parsed_then_unknown_command() {
    assert!(matches!(
        "dance".parse::<Command>(),
        Err(VibewiseError::UnknownCommand { .. })
    ));
    assert!(matches!(
        "cookie".parse::<Command>(),
        Err(VibewiseError::UnknownCommand { .. })
    ));
}

#[test]
fn given_detected_mood_when_described_then_emoji_label_and_percentage() {
    let result = DetectionResult::new("happy", 0.87).unwrap();

    let text = describe_detect(&DetectOutcome::Detected(result));

    assert!(text.starts_with("Mood: 😊 Happy (87.0%)."));
}

#[test]
fn given_failures_when_described_then_message_passed_through() {
    let message = String::from("Error: Failed to detect mood");

    assert_eq!(
        describe_detect(&DetectOutcome::Failed {
            message: message.clone()
        }),
        message
    );
    assert_eq!(
        describe_start(&StartOutcome::Failed {
            message: String::from("Camera access denied")
        }),
        "Camera access denied"
    );
}

#[test]
fn given_created_playlist_when_described_then_name_summary_and_link() {
    let info = PlaylistInfo {
        playlist: PlaylistSummary {
            name: String::from("Sunny Mix"),
        },
        spotify_url: String::from("https://open.spotify.com/playlist/1"),
        genres_used: Some(vec![String::from("pop"), String::from("funk")]),
        message: None,
    };

    let text = describe_playlist(&PlaylistOutcome::Created(info));

    assert_eq!(
        text,
        "Sunny Mix\nBased on pop, funk\nhttps://open.spotify.com/playlist/1"
    );
}
