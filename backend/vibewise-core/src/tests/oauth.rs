// Unit tests for the identity provider redirect URL

use crate::config::OAuthConfig;
use crate::session::oauth::build_authorize_url;

/// **VALUE**: Verifies every parameter the provider needs is present and encoded.
///
/// **WHY THIS MATTERS**: A wrong redirect URI or missing scope only shows up
/// after the user has already left the app.
///
/// **BUG THIS CATCHES**: Would catch scopes joined with commas or an unencoded
/// redirect URI.
#[test]
fn given_default_config_when_built_then_contains_code_flow_parameters() {
    // GIVEN
    let config = OAuthConfig::default();

    // WHEN
    let url = build_authorize_url(&config).expect("valid authorize url");

    // THEN
    assert_eq!(url.host_str(), Some("accounts.spotify.com"));
    assert_eq!(url.path(), "/authorize");

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("client_id"), Some("f99dc779642f4540b550a3217ea7a4a6"));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8000/callback/"));
    assert_eq!(
        get("scope"),
        Some(
            "user-read-private user-read-email user-top-read playlist-read-private \
             playlist-modify-public playlist-modify-private"
        )
    );
    assert_eq!(get("show_dialog"), Some("true"));
    assert!(url.as_str().contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8000%2Fcallback%2F"));
}

#[test]
fn given_invalid_authorize_url_when_built_then_url_parse_error() {
    let config = OAuthConfig {
        authorize_url: String::from("not a url"),
        ..OAuthConfig::default()
    };

    let err = build_authorize_url(&config).expect_err("should fail");

    assert_eq!(err.error_category(), "url_parse");
}
