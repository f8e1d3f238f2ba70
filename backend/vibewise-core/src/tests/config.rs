// Unit tests for ClientConfig load/save/validate

use crate::config::ClientConfig;
use crate::error::config::ConfigError;

use tempfile::TempDir;

/// **VALUE**: Verifies a first run without a config file uses the documented defaults.
///
/// **WHY THIS MATTERS**: Timing and capture settings drive user-visible behavior
/// (redirect delay, JPEG quality); silent drift changes the product.
///
/// **BUG THIS CATCHES**: Would catch a default function returning the wrong constant.
#[test]
fn given_missing_file_when_loaded_then_defaults_are_used() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");

    // WHEN
    let config = ClientConfig::load(dir.path()).expect("defaults");

    // THEN
    assert_eq!(config.version, 1);
    assert_eq!(config.server.base_url, "http://127.0.0.1:8000");
    assert_eq!(config.camera.ideal_width, 640);
    assert_eq!(config.camera.ideal_height, 480);
    assert_eq!(config.camera.facing_mode, "user");
    assert_eq!(config.camera.jpeg_quality, 80);
    assert_eq!(config.session.redirect_delay_ms, 1500);
    assert_eq!(config.session.auto_start_delay_ms, 1000);
    assert_eq!(config.session.return_intent_ttl_secs, 300);
    assert!(config.oauth.show_dialog);
    assert_eq!(config.oauth.scopes.len(), 6);
    assert!(config.server.csrf_meta_token.is_none());
}

/// **VALUE**: Verifies save then load preserves edited values and leaves no temp file.
///
/// **BUG THIS CATCHES**: Would catch a rename that never happens, leaving
/// `config.json.tmp` behind and the real file untouched.
#[test]
fn given_saved_config_when_loaded_then_values_survive_atomic_write() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = ClientConfig::default();
    config.server.base_url = String::from("https://vibewise.example");
    config.camera.jpeg_quality = 65;

    config.save(dir.path()).expect("save");
    let loaded = ClientConfig::load(dir.path()).expect("load");

    assert_eq!(loaded.server.base_url, "https://vibewise.example");
    assert_eq!(loaded.camera.jpeg_quality, 65);
    assert!(!dir.path().join("config.json.tmp").exists());
}

/// **VALUE**: Verifies partial files fill missing sections from defaults.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` making older
/// config files unreadable.
#[test]
fn given_partial_file_when_loaded_then_missing_sections_default() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"session": {"redirect_delay_ms": 10}}"#,
    )
    .expect("write");

    let config = ClientConfig::load(dir.path()).expect("load");

    assert_eq!(config.session.redirect_delay_ms, 10);
    assert_eq!(config.session.auto_start_delay_ms, 1000);
    assert_eq!(config.camera.jpeg_quality, 80);
}

#[test]
fn given_corrupt_file_when_loaded_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("config.json"), "{ not json").expect("write");

    let err = ClientConfig::load(dir.path()).expect_err("should fail");

    assert!(matches!(err, ConfigError::ParseError { .. }));
}

/// **VALUE**: Verifies out-of-range values are refused.
///
/// **BUG THIS CATCHES**: Would catch a zero TTL (intents that expire instantly)
/// or a JPEG quality the encoder rejects slipping through.
#[test]
fn given_invalid_values_when_validated_then_validation_error() {
    let mut bad_quality = ClientConfig::default();
    bad_quality.camera.jpeg_quality = 0;

    let mut bad_url = ClientConfig::default();
    bad_url.server.base_url = String::from("ftp://nope");

    let mut bad_ttl = ClientConfig::default();
    bad_ttl.session.return_intent_ttl_secs = 0;

    for config in [bad_quality, bad_url, bad_ttl] {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}

/// **VALUE**: Debug output of the config never carries the secrets.
///
/// **BUG THIS CATCHES**: Would catch a `{:?}` log line leaking the session
/// cookie or a CSRF token into the log file.
#[test]
fn given_secrets_set_when_debug_formatted_then_values_masked() {
    // GIVEN
    let mut config = ClientConfig::default();
    config.server.session_cookie = Some(String::from("sessionid=abc123secret"));
    config.server.csrf_meta_token = Some(String::from("meta-secret-token"));
    config.server.csrf_form_token = Some(String::from("form-secret-token"));

    // WHEN
    let printed = format!("{config:?}");

    // THEN
    assert!(!printed.contains("abc123secret"));
    assert!(!printed.contains("meta-secret-token"));
    assert!(!printed.contains("form-secret-token"));
    assert!(printed.contains("[REDACTED]"));
    assert!(printed.contains("http://127.0.0.1:8000"));
}
