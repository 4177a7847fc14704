//! Configuration loading and validation tests.

use riddle_rally::GameConfig;

#[test]
fn test_defaults() {
    let config = GameConfig::new();
    assert_eq!(*config.total_rounds(), 5);
    assert_eq!(*config.riddle_points(), 20);
    assert_eq!(*config.clue_cost(), 5);
    assert_eq!(*config.fetch_attempts(), 3);
    assert_eq!(config.llm().model(), "gpt-4o-mini");
    config.validate().expect("defaults are valid");
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("game.toml");
    std::fs::write(
        &path,
        r#"
total_rounds = 3

[llm]
provider = "anthropic"
model = "claude-3-5-haiku-20241022"
"#,
    )
    .expect("write config");

    let config = GameConfig::from_file(&path).expect("config loads");
    assert_eq!(*config.total_rounds(), 3);
    assert_eq!(*config.riddle_points(), 20, "default fills in");
    assert_eq!(*config.clue_cost(), 5, "default fills in");
    assert_eq!(config.llm().model(), "claude-3-5-haiku-20241022");
}

#[test]
fn test_full_file_overrides_everything() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("game.toml");
    std::fs::write(
        &path,
        r#"
total_rounds = 10
riddle_points = 30
clue_cost = 10
fetch_attempts = 5

[llm]
provider = "openai"
model = "gpt-4o"
max_tokens = 800
"#,
    )
    .expect("write config");

    let config = GameConfig::from_file(&path).expect("config loads");
    assert_eq!(*config.total_rounds(), 10);
    assert_eq!(*config.riddle_points(), 30);
    assert_eq!(*config.clue_cost(), 10);
    assert_eq!(*config.fetch_attempts(), 5);
    assert_eq!(*config.llm().max_tokens(), 800);
}

#[test]
fn test_zero_rounds_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "total_rounds = 0\n").expect("write config");

    let error = GameConfig::from_file(&path).expect_err("zero rounds is invalid");
    assert!(error.message.contains("total_rounds"));
}

#[test]
fn test_points_must_step_down_to_zero() {
    let config = GameConfig::new().with_riddle_points(17).with_clue_cost(5);
    let error = config.validate().expect_err("17 is not a multiple of 5");
    assert!(error.message.contains("multiple"));
}

#[test]
fn test_zero_clue_cost_rejected() {
    let config = GameConfig::new().with_clue_cost(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_fetch_attempts_rejected() {
    let config = GameConfig::new().with_fetch_attempts(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_file_reports_error() {
    let error = GameConfig::from_file("/nonexistent/game.toml").expect_err("no such file");
    assert!(error.message.contains("Failed to read"));
}

#[test]
fn test_malformed_toml_reports_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("game.toml");
    std::fs::write(&path, "total_rounds = [not toml").expect("write config");

    let error = GameConfig::from_file(&path).expect_err("parse failure");
    assert!(error.message.contains("Failed to parse"));
}
