use predicates::prelude::predicate;
use serde_json::Value;
use tempfile::tempdir;

const CUSTOM_REGISTRY: &str = r#"
core_fields:
  name: {type: string, required: true}
  check_type: {type: fixed, value_from_parent: true}
check_types:
  row_count:
    fields:
      minimum: {type: string, default: "1"}
      severity: {type: select, options: [low, high], default: high}
"#;

#[test]
fn registry_file_replaces_builtin_check_types() {
    let dir = tempdir().expect("tempdir");
    let registry = dir.path().join("registry.yaml");
    std::fs::write(&registry, CUSTOM_REGISTRY).expect("write registry");

    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .arg("--registry")
        .arg(&registry)
        .arg("list")
        .assert()
        .code(0)
        .stdout("[\"row_count\"]\n");

    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .arg("--registry")
        .arg(&registry)
        .args(["build", "--check-type", "row_count", "--set", "name=rc"])
        .output()
        .expect("build");
    assert_eq!(output.status.code(), Some(0));
    let document: Value = serde_json::from_slice(&output.stdout).expect("document");
    assert_eq!(
        document,
        serde_json::json!({
            "name": "rc",
            "check_type": "row_count",
            "minimum": "1",
            "severity": "high"
        })
    );
}

#[test]
fn unknown_field_kind_is_fatal_at_startup() {
    let dir = tempdir().expect("tempdir");
    let registry = dir.path().join("registry.json");
    std::fs::write(
        &registry,
        r#"{"check_types": {"broken": {"fields": {"limit": {"type": "integer"}}}}}"#,
    )
    .expect("write registry");

    let output = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .arg("--registry")
        .arg(&registry)
        .arg("list")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let error: Value = serde_json::from_slice(&output.stderr).expect("error json");
    assert_eq!(error["error"], "config_error");
    assert_eq!(
        error["message"],
        "field `broken.limit` has unknown kind `integer`"
    );
}

#[test]
fn missing_registry_file_is_a_config_error() {
    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args(["--registry", "does-not-exist.yaml", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"error\":\"config_error\""));
}
