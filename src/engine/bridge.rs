use serde::{Deserialize, Serialize};
use serde_json::Value;
use tera::{Context, Tera};
use uuid::Uuid;

use crate::domain::document::OutputDocument;
use crate::domain::error::BridgeError;

/// Message type the embedding page listens for.
pub const MESSAGE_TYPE: &str = "miqa-test-apply-direct";

pub const SENT_NOTICE: &str = "Assertion sent! Use Cmd/Ctrl + Shift + V to paste it in your app.";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Apply assertion</title>
</head>
<body>
<div style="margin-top: 1rem;">
    <button onclick="applyTest_{{ element_id }}()" style="padding: 8px 16px; background-color: #007bff; color: white; border: none; border-radius: 6px; font-size: 1rem; cursor: pointer;">Apply This Assertion</button>

    <textarea id="text_{{ element_id }}" style="position: absolute; left: -9999px;">{{ document_json }}</textarea>

    <div id="toast_{{ element_id }}" style="display: none; position: fixed; top: 30px; left: 50%; transform: translateX(-50%); background-color: #28a745; color: white; padding: 10px 20px; border-radius: 8px; font-size: 14px; box-shadow: 0 2px 6px rgba(0, 0, 0, 0.2); z-index: 9999;">
        {{ notice }}
    </div>

    <script>
    function applyTest_{{ element_id }}() {
        try {
            var text = document.getElementById("text_{{ element_id }}").value;
            var json = JSON.parse(text);
            window.top.postMessage({ type: "{{ message_type }}", payload: json }, "*");

            var toast = document.getElementById("toast_{{ element_id }}");
            toast.style.display = "block";
            setTimeout(function () { toast.style.display = "none"; }, 3000);
        } catch (err) {
            console.error("Failed to send test:", err);
        }
    }
    </script>
</div>
</body>
</html>
"#;

/// Envelope posted to the top-level window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub payload: OutputDocument,
}

impl HostMessage {
    pub fn apply_direct(payload: OutputDocument) -> Self {
        Self {
            message_type: MESSAGE_TYPE.to_string(),
            payload,
        }
    }
}

/// Parses the displayed assertion text back into a document.
pub fn parse_document(text: &str) -> Result<OutputDocument, BridgeError> {
    match serde_json::from_str::<Value>(text).map_err(BridgeError::Parse)? {
        Value::Object(document) => Ok(document),
        other => Err(BridgeError::NotAnObject {
            actual: json_type_name(&other),
        }),
    }
}

/// Builds the host message from the displayed assertion text.
pub fn message_from_text(text: &str) -> Result<HostMessage, BridgeError> {
    parse_document(text).map(HostMessage::apply_direct)
}

/// Renders the standalone page that posts `document` to its parent window.
pub fn render_page(document: &OutputDocument) -> Result<String, BridgeError> {
    let document_json = serde_json::to_string_pretty(document).map_err(BridgeError::Serialize)?;
    let mut context = Context::new();
    context.insert("element_id", &Uuid::new_v4().simple().to_string());
    context.insert("document_json", &document_json);
    context.insert("message_type", MESSAGE_TYPE);
    context.insert("notice", SENT_NOTICE);
    Ok(Tera::one_off(PAGE_TEMPLATE, &context, true)?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
