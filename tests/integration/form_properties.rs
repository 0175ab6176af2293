use miqa_assert::domain::schema::FieldKind;
use miqa_assert::engine::expression::{ExpressionCheck, check_expression};
use miqa_assert::engine::registry::SchemaRegistry;
use miqa_assert::engine::render::{PresetInput, render};
use regex::Regex;
use serde_json::{Value, json};

#[test]
fn fields_for_every_check_type_contains_core_and_specific_fields() {
    let registry = SchemaRegistry::builtin();
    for check_type in registry.check_types() {
        let merged = registry.fields_for(check_type).expect("known type");
        let specific = registry.specific_fields(check_type).expect("known type");
        for name in registry.core_fields().names() {
            assert!(merged.contains(name), "{check_type} lacks core field {name}");
        }
        for (name, descriptor) in specific.iter() {
            assert_eq!(
                merged.get(name),
                Some(descriptor),
                "{check_type}.{name} must win over core"
            );
        }
    }
}

#[test]
fn postproc_example_document() {
    let fields = SchemaRegistry::builtin()
        .fields_for("postproc_results")
        .expect("known type");
    let mut input = PresetInput::new()
        .with("name", "t1")
        .with("processor_key", "flagstat")
        .with("stat", "")
        .with("postprocessed_file_pattern", "");

    let outcome = render("postproc_results", &fields, &mut input).expect("render");
    let mut document = Value::Object(outcome.document);
    let id = document["id"].as_str().expect("generated id").to_string();
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
fn expression_examples() {
    assert_eq!(
        check_expression("data.rows.map('%PF').mean() > 0.9"),
        ExpressionCheck::Valid
    );
    let ExpressionCheck::Invalid(message) = check_expression("data.rows.map((") else {
        panic!("unclosed call must fail");
    };
    assert!(!message.is_empty());
}

#[test]
fn repeated_renders_differ_only_in_generated_ids() {
    let registry = SchemaRegistry::builtin();
    let id_pattern = Regex::new("^assertion_[0-9a-f]{8}$").expect("regex");
    for check_type in registry.check_types() {
        let fields = registry.fields_for(check_type).expect("known type");
        let input = PresetInput::new().with("name", "same");

        let mut first = render(check_type, &fields, &mut input.clone()).expect("first");
        let mut second = render(check_type, &fields, &mut input.clone()).expect("second");
        for outcome in [&first, &second] {
            let id = outcome.document["id"].as_str().expect("id");
            assert!(id_pattern.is_match(id), "{id}");
        }
        first.document.remove("id");
        second.document.remove("id");
        assert_eq!(first, second);
    }
}

#[test]
fn select_defaults_fall_back_to_first_option() {
    let fields = SchemaRegistry::builtin()
        .fields_for("postproc_results")
        .expect("known type");
    let FieldKind::Select { options, default } = &fields.get("processor_key").expect("field").kind
    else {
        panic!("processor_key is a select");
    };
    assert!(default.is_none());

    let outcome = render("postproc_results", &fields, &mut PresetInput::new()).expect("render");
    assert_eq!(outcome.document["processor_key"], json!(options[0]));
}
