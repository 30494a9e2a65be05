// integration tests for `lfilter match`

use crate::common::{json_output, run_lfilter, stderr_of, stdout_of};

#[test]
fn test_match_true_exits_zero() {
    let output = run_lfilter(&[
        "--no-json",
        "match",
        "role=controller and rack=1",
        "-l",
        "role=controller",
        "-l",
        "rack=1",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output).trim(), "true");
}

#[test]
fn test_match_false_exits_no_match() {
    let output = run_lfilter(&["--no-json", "match", "role=compute", "-l", "role=controller"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_of(&output).trim(), "false");
}

#[test]
fn test_match_flag_labels() {
    let output = run_lfilter(&["--no-json", "match", "not decommissioned", "-L", "decommissioned"]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_lfilter(&["--no-json", "match", "ssd", "-L", "ssd"]);
    assert!(output.status.success());
}

#[test]
fn test_match_empty_filter_matches() {
    let output = run_lfilter(&["--no-json", "match", ""]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).trim(), "true");
}

#[test]
fn test_match_json_output() {
    let output = run_lfilter(&["--json", "match", "rack", "-l", "rack=3"]);
    assert!(output.status.success());

    let json = json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["matched"], true);
    assert_eq!(json["result"]["filter"], "rack");
    assert_eq!(json["result"]["labels"]["rack"], "3");
}

#[test]
fn test_match_quiet_prints_nothing() {
    let output = run_lfilter(&["-q", "match", "a", "-L", "a"]);
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn test_match_invalid_filter() {
    let output = run_lfilter(&["--no-json", "match", "(role=controller"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("invalid filter expression"), "stderr: {}", stderr);
    assert!(stderr.contains("^"));
}

#[test]
fn test_match_missing_operand_json_error() {
    let output = run_lfilter(&["--json", "match", "a and", "-L", "a"]);

    assert_eq!(output.status.code(), Some(3));
    let json = json_output(&output);
    assert_eq!(json["error"]["code"], -32003);
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("insufficient operands for operator 'and'"));
}

#[test]
fn test_match_rejects_malformed_label() {
    let output = run_lfilter(&["match", "a", "-l", "novalue"]);
    assert!(!output.status.success());
}
