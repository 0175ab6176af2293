use predicates::prelude::*;
use serde_json::Value;

#[test]
fn bridge_payload_equals_built_document() {
    let built = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args([
            "build",
            "--check-type",
            "postproc_results",
            "--set",
            "name=t1",
            "--set",
            "processor_key=bcftools_stats",
        ])
        .output()
        .expect("build");
    assert_eq!(built.status.code(), Some(0));
    let displayed: Value = serde_json::from_slice(&built.stdout).expect("document");

    let bridged = assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .arg("bridge")
        .write_stdin(built.stdout.clone())
        .output()
        .expect("bridge");
    assert_eq!(bridged.status.code(), Some(0));
    let message: Value = serde_json::from_slice(&bridged.stdout).expect("message");
    assert_eq!(message["type"], "miqa-test-apply-direct");
    assert_eq!(message["payload"], displayed);

    let notice: Value = serde_json::from_slice(&bridged.stderr).expect("notice");
    assert_eq!(notice["notice"], "assertion_sent");
}

#[test]
fn bridge_parse_failure_is_logged_without_notice() {
    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .arg("bridge")
        .write_stdin("{\"name\": ")
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("\"error\":\"bridge_error\""))
        .stderr(predicate::str::contains("assertion_sent").not());
}

#[test]
fn bridge_page_embeds_document() {
    assert_cmd::cargo::cargo_bin_cmd!("miqa-assert")
        .args(["bridge", "--page"])
        .write_stdin("{\"name\": \"t1\"}")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("window.top.postMessage"))
        .stdout(predicate::str::contains("&quot;name&quot;: &quot;t1&quot;"))
        .stderr(predicate::str::is_empty());
}
