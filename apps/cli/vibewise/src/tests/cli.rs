// Unit tests for argument parsing and config resolution

use crate::cli::{Args, DEFAULT_FRAME_FILE, load_config};

use vibewise_core::config::{CONFIG_FILE_NAME, ClientConfig};

use std::path::PathBuf;

use clap::Parser;

fn parse(extra: &[&str]) -> Args {
    let mut argv = vec!["vibewise"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn given_no_arguments_when_parsed_then_defaults() {
    let args = parse(&[]);

    assert_eq!(args.frame, PathBuf::from(DEFAULT_FRAME_FILE));
    assert!(args.base_url.is_none());
    assert!(args.session_cookie.is_none());
}

#[test]
fn given_explicit_dirs_when_resolved_then_used_verbatim() {
    let args = parse(&["--config-dir", "/tmp/vw-config", "--log-dir", "/tmp/vw-logs"]);

    let config_dir = args.resolve_config_dir().expect("config dir");

    assert_eq!(config_dir, PathBuf::from("/tmp/vw-config"));
    assert_eq!(args.resolve_log_dir(&config_dir), PathBuf::from("/tmp/vw-logs"));
}

#[test]
fn given_no_log_dir_when_resolved_then_config_dir_used() {
    let args = parse(&["--config-dir", "/tmp/vw-config"]);

    let config_dir = args.resolve_config_dir().expect("config dir");

    assert_eq!(args.resolve_log_dir(&config_dir), config_dir);
}

/// **VALUE**: First run leaves an editable config file behind.
///
/// **WHY THIS MATTERS**: CSRF tokens and the server address live in that file.
/// Users need something to edit instead of writing JSON from scratch.
///
/// **BUG THIS CATCHES**: Would catch defaults being used silently with no file
/// written, or overrides leaking into the saved file.
#[test]
fn given_empty_config_dir_when_loaded_then_defaults_written_without_overrides() {
    // GIVEN
    let dir = tempfile::tempdir().unwrap();
    let args = parse(&[
        "--base-url",
        "http://localhost:9000",
        "--session-cookie",
        "sessionid=secret",
    ]);

    // WHEN
    let config = load_config(&args, dir.path()).expect("config");

    // THEN: the running config has the overrides
    assert_eq!(config.server.base_url, "http://localhost:9000");
    assert_eq!(config.server.session_cookie.as_deref(), Some("sessionid=secret"));

    // AND: the file on disk has the defaults only
    assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    let saved = ClientConfig::load(dir.path()).expect("saved config");
    assert_eq!(saved.server.base_url, ClientConfig::default().server.base_url);
    assert!(saved.server.session_cookie.is_none());
}

#[test]
fn given_invalid_base_url_override_when_loaded_then_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = parse(&["--base-url", "ftp://example.com"]);

    let err = load_config(&args, dir.path()).expect_err("should be rejected");

    assert!(matches!(err, crate::error::VibewiseError::Config { .. }));
}
