use predicates::prelude::predicate;
use regex::Regex;
use serde_json::{Value, json};
use tempfile::tempdir;

fn parse_stderr_json_lines(stderr: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(stderr.to_vec()).expect("stderr utf8");
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stderr json line"))
        .collect()
}

#[test]
fn build_prints_pretty_document_with_generated_id() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "postproc_results",
            "--set",
            "name=t1",
            "--set",
            "processor_key=flagstat",
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("{\n  \"name\": \"t1\",\n  \"id\": \"assertion_"));
    let mut document: Value = serde_json::from_str(&stdout).expect("document json");
    let id = document["id"].as_str().expect("id").to_string();
    assert!(Regex::new("^assertion_[0-9a-f]{8}$").expect("regex").is_match(&id));

    document["id"] = json!("<generated>");
    assert_eq!(
        document,
        json!({
            "name": "t1",
            "id": "<generated>",
            "failtype": "fail",
            "check_type": "postproc_results",
            "processor_key": "flagstat",
            "item_typ1e": "outputfile"
        })
    );
}

#[test]
fn build_reports_expression_diagnostics_on_stderr() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "tabular_mdo_eval",
            "--set",
            "name=rows",
            "--set",
            "stat=data.rows.map((",
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let records = parse_stderr_json_lines(&output.stderr);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["field"], "stat");
    assert_eq!(records[0]["level"], "error");
    assert!(
        records[0]["message"]
            .as_str()
            .expect("message")
            .starts_with("Invalid expression: ")
    );
    let document: Value = serde_json::from_slice(&output.stdout).expect("document");
    assert_eq!(document["stat"], "data.rows.map((");
}

#[test]
fn build_notes_valid_expressions() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "tabular_mdo_eval",
            "--set",
            "name=rows",
            "--set",
            "stat=data.rows.map('%PF').mean() > 0.9",
        ])
        .output()
        .expect("run");
    let records = parse_stderr_json_lines(&output.stderr);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "info");
}

#[test]
fn build_reads_values_file() {
    let dir = tempdir().expect("tempdir");
    let values = dir.path().join("values.toml");
    std::fs::write(
        &values,
        "name = \"rows\"\nid = \"assertion_cafe0001\"\ncomment_character = \"#\"\n",
    )
    .expect("write values");

    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args(["build", "--check-type", "tabular_mdo_eval", "--values"])
        .arg(&values)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let document: Value = serde_json::from_slice(&output.stdout).expect("document");
    assert_eq!(
        document,
        json!({
            "name": "rows",
            "id": "assertion_cafe0001",
            "failtype": "fail",
            "check_type": "tabular_mdo_eval",
            "comment_character": "#"
        })
    );
}

#[test]
fn build_rejects_invalid_choice() {
    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "postproc_results",
            "--set",
            "processor_key=samtools",
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid value `samtools`"));
}

#[test]
fn build_interactive_prompts_on_stderr() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args(["build", "--check-type", "postproc_results", "--interactive"])
        .write_stdin("t1\n\n\n4\n\n\n")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let document: Value = serde_json::from_slice(&output.stdout).expect("document");
    assert_eq!(document["name"], "t1");
    assert_eq!(document["processor_key"], "flagstat");
    let prompts = String::from_utf8(output.stderr).expect("utf8");
    assert!(prompts.contains("processor_key *"));
}

#[test]
fn build_emit_pipeline_reports_sources_and_steps() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "--emit-pipeline",
            "build",
            "--check-type",
            "postproc_results",
            "--set",
            "name=t1",
        ])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let records = parse_stderr_json_lines(&output.stderr);
    let report = records.last().expect("pipeline report");
    assert_eq!(report["command"], "build");
    assert_eq!(
        report["input"]["sources"],
        json!([
            {"label": "registry", "source": "builtin"},
            {"label": "assignments", "source": "flags"}
        ])
    );
    assert!(
        report["steps"]
            .as_array()
            .expect("steps")
            .contains(&json!("render_fields"))
    );
}

#[test]
fn build_page_output_is_html() {
    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "postproc_results",
            "--set",
            "name=t1",
            "--output",
            "page",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("miqa-test-apply-direct"));
}
