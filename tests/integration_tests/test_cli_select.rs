// integration tests for `lfilter select`

use std::fs;

use crate::common::{json_output, run_lfilter, run_lfilter_with_stdin, stderr_of, stdout_of, INVENTORY};

#[test]
fn test_select_names_in_input_order() {
    let output = run_lfilter_with_stdin(&["select", "rack=1 or role=controller", "--names"], INVENTORY);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let names: Vec<String> = stdout_of(&output).lines().map(String::from).collect();
    assert_eq!(names, vec!["ctl-0", "ctl-1", "cmp-0"]);
}

#[test]
fn test_select_text_lines_include_labels() {
    let output = run_lfilter_with_stdin(&["--no-json", "select", "decommissioned"], INVENTORY);

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output).trim(),
        "cmp-1\tdecommissioned=yes,rack=2,role=compute"
    );
}

#[test]
fn test_select_format_template() {
    let output = run_lfilter_with_stdin(
        &["select", "role=controller", "--format", "{name}:{labels.rack}"],
        INVENTORY,
    );

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "ctl-0:1\nctl-1:2\n");
}

#[test]
fn test_select_json_counts() {
    let output = run_lfilter_with_stdin(&["--json", "select", "not decommissioned"], INVENTORY);

    assert!(output.status.success());
    let json = json_output(&output);
    assert_eq!(json["result"]["total"], 4);
    assert_eq!(json["result"]["matched"], 3);
    assert_eq!(json["result"]["entities"][0]["name"], "ctl-0");
    assert_eq!(json["result"]["entities"][0]["labels"]["role"], "controller");
}

#[test]
fn test_select_nothing_exits_no_match() {
    let output = run_lfilter_with_stdin(&["select", "role=storage", "--names"], INVENTORY);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_select_object_input_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodes.json5");
    fs::write(
        &path,
        "{\n  // keyed by name\n  'web-1': { tier: 'front', replicas: 3 },\n  'db-1': { tier: 'back', primary: true },\n}\n",
    )
    .unwrap();

    let output = run_lfilter(&[
        "select",
        "primary=true or replicas=3",
        "--names",
        "-i",
        path.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let mut names: Vec<String> = stdout_of(&output).lines().map(String::from).collect();
    names.sort();
    assert_eq!(names, vec!["db-1", "web-1"]);
}

#[test]
fn test_select_warns_about_unknown_label() {
    let output = run_lfilter_with_stdin(&["select", "rol=controller", "--names"], INVENTORY);

    assert_eq!(output.status.code(), Some(2));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("no entity has label 'rol'"), "stderr: {}", stderr);
    assert!(stderr.contains("role"));
}

#[test]
fn test_select_malformed_input() {
    let output = run_lfilter_with_stdin(&["--no-json", "select", "a"], "[1, 2");

    assert_eq!(output.status.code(), Some(6));
    assert!(stderr_of(&output).starts_with("Error:"));
}

#[test]
fn test_select_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let output = run_lfilter(&["--no-json", "select", "a", "-i", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(6));
}
