use miqa_assert::domain::error::SchemaError;
use miqa_assert::engine::registry::SchemaRegistry;
use miqa_assert::engine::render::{PresetInput, render};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn toml_registry_keeps_field_order() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("registry.toml");
    std::fs::write(
        &path,
        r#"
[core_fields.name]
type = "string"
required = true

[core_fields.check_type]
type = "fixed"
value_from_parent = true

[check_types.vcf_check.fields.zeta]
type = "fixed"
value = "z"

[check_types.vcf_check.fields.alpha]
type = "expression"
placeholder = "e.g. data.ok"
"#,
    )
    .expect("write registry");

    let registry = SchemaRegistry::load(&path).expect("load");
    let fields = registry.fields_for("vcf_check").expect("known type");
    let names: Vec<_> = fields.names().collect();
    assert_eq!(names, vec!["name", "check_type", "zeta", "alpha"]);

    let mut input = PresetInput::new().with("name", "v").with("alpha", "data.ok");
    let outcome = render("vcf_check", &fields, &mut input).expect("render");
    assert_eq!(
        serde_json::Value::Object(outcome.document),
        json!({"name": "v", "check_type": "vcf_check", "zeta": "z", "alpha": "data.ok"})
    );
}

#[test]
fn unreadable_registry_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("registry.yaml");
    std::fs::write(&path, "check_types: [").expect("write registry");

    let error = SchemaRegistry::load(&path).expect_err("invalid yaml");
    assert!(matches!(error, SchemaError::Load { .. }));
    assert!(error.to_string().contains("registry.yaml"));
}
