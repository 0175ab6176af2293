use std::io::Cursor;

use miqa_assert::cmd::CommandOutput;
use miqa_assert::cmd::build::{BuildCommandArgs, run_with_io};
use miqa_assert::engine::conform::check_document;
use miqa_assert::engine::registry::SchemaRegistry;
use serde_json::Value;

#[test]
fn built_documents_pass_conformance_for_every_check_type() {
    let registry = SchemaRegistry::builtin();
    for check_type in registry.check_types() {
        let args = BuildCommandArgs {
            check_type: check_type.to_string(),
            assignments: vec!["name=flow".to_string()],
            ..BuildCommandArgs::default()
        };
        let response = run_with_io(registry, &args, Cursor::new(""), Vec::new());
        assert_eq!(response.exit_code, 0, "{check_type}");
        let Some(CommandOutput::PrettyJson(Value::Object(document))) = response.stdout else {
            panic!("expected document for {check_type}");
        };

        let report = check_document(registry, &document, None).expect("report");
        assert!(report.matched, "{check_type}: {:?}", report.mismatches);
    }
}

#[test]
fn documents_without_required_name_do_not_conform() {
    let registry = SchemaRegistry::builtin();
    let args = BuildCommandArgs {
        check_type: "tabular_mdo_eval".to_string(),
        ..BuildCommandArgs::default()
    };
    let response = run_with_io(registry, &args, Cursor::new(""), Vec::new());
    let Some(CommandOutput::PrettyJson(Value::Object(document))) = response.stdout else {
        panic!("expected document");
    };
    assert!(!document.contains_key("name"));

    let report = check_document(registry, &document, None).expect("report");
    assert!(!report.matched);
    assert_eq!(report.mismatches[0].reason, "schema_mismatch");
}
