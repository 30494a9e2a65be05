// integration tests for `lfilter config` and saved filters

use std::fs;

use crate::common::{missing_config_path, run_lfilter, run_lfilter_with_config, stderr_of, stdout_of};

#[test]
fn test_config_path_follows_env() {
    let output = run_lfilter(&["config", "path"]);

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output).trim(),
        missing_config_path().display().to_string()
    );
}

#[test]
fn test_config_path_flag_overrides_env() {
    let output = run_lfilter(&["--config", "/tmp/elsewhere.json", "config", "path"]);
    assert_eq!(stdout_of(&output).trim(), "/tmp/elsewhere.json");
}

#[test]
fn test_config_show_missing_file_is_default() {
    let output = run_lfilter(&["config", "show"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["filters"], serde_json::json!({}));
    assert_eq!(json["settings"]["fuzzy_threshold"], 2);
}

#[test]
fn test_config_set_and_use_saved_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    let output = run_lfilter_with_config(
        &["config", "set", "filters.ctl", "role=controller"],
        &config,
    );
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(config.exists());

    let output = run_lfilter_with_config(
        &["--no-json", "match", "@ctl", "-l", "role=controller"],
        &config,
    );
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), "true");

    let output = run_lfilter_with_config(&["config", "verify"], &config);
    assert!(output.status.success());
}

#[test]
fn test_config_set_rejects_invalid_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    let output = run_lfilter_with_config(&["config", "set", "filters.bad", "(a"], &config);

    assert_eq!(output.status.code(), Some(5));
    assert!(!config.exists());
}

#[test]
fn test_unknown_saved_filter_suggests_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ filters: { controllers: "role=controller" } }"#).unwrap();

    let output = run_lfilter_with_config(&["--no-json", "match", "@controlers"], &config);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr_of(&output).contains("Did you mean: controllers"));
}

#[test]
fn test_config_unset_removes_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ "filters": { "a": "x", "b": "y" } }"#).unwrap();

    let output = run_lfilter_with_config(&["config", "unset", "a"], &config);
    assert!(output.status.success());

    let content = fs::read_to_string(&config).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["filters"].get("a").is_none());
    assert_eq!(json["filters"]["b"], "y");

    let output = run_lfilter_with_config(&["config", "unset", "a"], &config);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_config_verify_reports_bad_filters() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{ "filters": { "broken": "a)" } }"#).unwrap();

    let output = run_lfilter_with_config(&["--no-json", "config", "verify"], &config);

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout_of(&output).contains("filters.broken"));
}

#[test]
fn test_config_default_has_examples() {
    let output = run_lfilter(&["config", "default"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["filters"]["controllers"], "role=controller");
}
