// Unit tests for RedactedToken

use crate::RedactedToken;

/// **VALUE**: Verifies the token value never shows up in Debug or Display output.
///
/// **WHY THIS MATTERS**: CSRF tokens are attached to every mutating request and
/// the request path logs heavily. A leaked token in a log file is a replayable secret.
///
/// **BUG THIS CATCHES**: Would catch a `#[derive(Debug)]` replacing the manual impl.
#[test]
fn given_token_when_formatted_then_value_is_redacted() {
    // GIVEN: A token with a recognisable value
    let token = RedactedToken::new("s3cr3t-csrf");

    // WHEN: Formatting it both ways
    let debug = format!("{:?}", token);
    let display = format!("{}", token);

    // THEN: Neither contains the secret
    assert!(!debug.contains("s3cr3t"));
    assert!(!display.contains("s3cr3t"));
    assert_eq!(token.as_str(), "s3cr3t-csrf");
    assert_eq!(token.len(), 11);
}

/// **VALUE**: Verifies serialization is refused.
///
/// **BUG THIS CATCHES**: Would catch someone deriving Serialize so the token ends up
/// in a JSON body or a saved config file.
#[test]
fn given_token_when_serialized_then_returns_error() {
    let token = RedactedToken::new("abc");

    let result = serde_json::to_string(&token);

    assert!(result.is_err(), "RedactedToken must not serialize");
}
