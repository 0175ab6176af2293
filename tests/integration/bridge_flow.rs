use miqa_assert::engine::bridge::{HostMessage, MESSAGE_TYPE, message_from_text, render_page};
use miqa_assert::engine::registry::SchemaRegistry;
use miqa_assert::engine::render::{PresetInput, render};

#[test]
fn message_payload_deep_equals_displayed_document() {
    let fields = SchemaRegistry::builtin()
        .fields_for("tabular_mdo_eval")
        .expect("known type");
    let mut input = PresetInput::new()
        .with("name", "pf-ratio")
        .with("stat", "data.rows.map('%PF').mean() > 0.9")
        .with("file_rules", r".*\.csv$")
        .with("delimiter", ",");
    let outcome = render("tabular_mdo_eval", &fields, &mut input).expect("render");

    let displayed = serde_json::to_string_pretty(&outcome.document).expect("display");
    let message = message_from_text(&displayed).expect("bridge");
    assert_eq!(message, HostMessage::apply_direct(outcome.document.clone()));
    assert_eq!(message.message_type, MESSAGE_TYPE);

    let keys: Vec<_> = message.payload.keys().cloned().collect();
    let expected: Vec<_> = outcome.document.keys().cloned().collect();
    assert_eq!(keys, expected);
}

#[test]
fn page_carries_the_displayed_document() {
    let fields = SchemaRegistry::builtin()
        .fields_for("postproc_results")
        .expect("known type");
    let mut input = PresetInput::new().with("name", "t1");
    let outcome = render("postproc_results", &fields, &mut input).expect("render");

    let page = render_page(&outcome.document).expect("page");
    assert!(page.contains("&quot;item_typ1e&quot;: &quot;outputfile&quot;"));
    assert!(page.contains("setTimeout"));
}
