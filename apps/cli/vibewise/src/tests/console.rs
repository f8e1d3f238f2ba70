// Unit tests for the terminal platform capabilities

use crate::console::{
    ConsoleConfirmation, ConsoleInput, ConsoleNavigator, format_notification, parse_answer,
};

use vibewise_core::platform::{Confirmation, Navigator, NotificationLevel};

use std::sync::Arc;

fn input(text: &'static str) -> Arc<ConsoleInput> {
    Arc::new(ConsoleInput::new(Box::new(text.as_bytes())))
}

#[test]
fn given_answers_when_parsed_then_only_yes_accepts() {
    assert!(parse_answer("y"));
    assert!(parse_answer("  YES \r"));
    assert!(!parse_answer(""));
    assert!(!parse_answer("n"));
    assert!(!parse_answer("yep"));
}

/// **VALUE**: A confirmation consumes exactly one line of shared input.
///
/// **WHY THIS MATTERS**: The command loop and prompts read the same stdin. A
/// prompt that read ahead would swallow the user's next command.
///
/// **BUG THIS CATCHES**: Would catch the prompt draining the reader or the
/// loop and the prompt each buffering their own copy of stdin.
#[tokio::test]
async fn given_shared_input_when_confirmed_then_next_line_left_for_loop() {
    // GIVEN
    let shared = input("y\ndetect\n");
    let confirmation = ConsoleConfirmation::new(shared.clone());

    // WHEN
    let accepted = confirmation.confirm("Proceed?").await;

    // THEN
    assert!(accepted);
    assert_eq!(
        shared.next_line().await.expect("readable").as_deref(),
        Some("detect")
    );
}

#[tokio::test]
async fn given_closed_input_when_confirmed_then_declined() {
    let confirmation = ConsoleConfirmation::new(input(""));

    assert!(!confirmation.confirm("Proceed?").await);
}

#[test]
fn given_levels_when_formatted_then_tagged() {
    assert_eq!(
        format_notification(NotificationLevel::Success, "Camera started successfully!"),
        "[ok] Camera started successfully!"
    );
    assert_eq!(format_notification(NotificationLevel::Error, "x"), "[error] x");
    assert_eq!(format_notification(NotificationLevel::Info, "x"), "[info] x");
}

/// **VALUE**: Site paths move the user, external URLs do not.
///
/// **BUG THIS CATCHES**: Would catch the OAuth address replacing the current
/// page, which makes the return intent look like it came from a foreign path.
#[test]
fn given_navigator_when_targets_visited_then_only_site_paths_change_page() {
    let navigator = ConsoleNavigator::new("/");

    navigator.navigate("/login/");
    assert_eq!(navigator.current_path(), "/login/");

    navigator.navigate("https://accounts.spotify.com/authorize?client_id=x");
    assert_eq!(navigator.current_path(), "/login/");
    assert_eq!(
        navigator.last_target().as_deref(),
        Some("https://accounts.spotify.com/authorize?client_id=x")
    );
}
