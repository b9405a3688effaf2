use std::{fs, path::PathBuf};

use multitap::{ConfigError, TapConfig, TapRecognizer};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn shipped_config_matches_defaults() {
    let config = TapConfig::from_path(&repo_root().join("config/tap.toml"))
        .expect("shipped config should load");
    assert_eq!(config, TapConfig::default());
}

#[test]
fn config_file_overrides_build_a_recognizer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("triple.toml");
    fs::write(
        &path,
        "[tap]\nevent = \"tripletap\"\ntaps = 3\ninterval = 400\n",
    )
    .expect("write fixture");

    let config = TapConfig::from_path(&path).expect("fixture should load");
    assert_eq!(config.taps, 3);
    assert_eq!(config.interval, 400);
    assert_eq!(config.time, 250);

    let recognizer = TapRecognizer::new(config).expect("valid config");
    assert_eq!(recognizer.config().event, "tripletap");
}

#[test]
fn invalid_file_reports_validation_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[tap]\ntaps = 0\n").expect("write fixture");

    match TapConfig::from_path(&path) {
        Err(ConfigError::Validation(msg)) => assert!(msg.contains("tap.taps")),
        other => panic!("expected validation error, got {other:?}"),
    }
}
