use jsonschema::validator_for;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::domain::document::OutputDocument;
use crate::domain::report::{CheckReport, MismatchEntry};
use crate::domain::schema::{FieldKind, FieldSet, FixedValue};
use crate::engine::expression::{ExpressionCheck, check_expression};
use crate::engine::registry::SchemaRegistry;

#[derive(Debug, Error)]
pub enum ConformError {
    #[error("{0}")]
    InputUsage(String),
    #[error("{0}")]
    Internal(String),
}

/// JSON Schema an assertion of `check_type` must satisfy.
///
/// Fixed and select fields always appear in rendered output, so they are
/// required along with fields marked `required`.
pub fn document_schema(check_type: &str, fields: &FieldSet) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, descriptor) in fields.iter() {
        let property = match &descriptor.kind {
            FieldKind::Fixed(FixedValue::Literal(value)) => json!({"const": value}),
            FieldKind::Fixed(FixedValue::FromParent) => json!({"const": check_type}),
            FieldKind::Select { options, .. } => json!({"type": "string", "enum": options}),
            FieldKind::String { .. } | FieldKind::Expression { .. } => json!({"type": "string"}),
        };
        let always_present = matches!(
            descriptor.kind,
            FieldKind::Fixed(_) | FieldKind::Select { .. }
        );
        if descriptor.required || always_present {
            required.push(Value::String(name.to_string()));
        }
        properties.insert(name.to_string(), property);
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Validates an existing assertion document against its check type.
///
/// The check type comes from `explicit` when given, else from the document's
/// own `check_type` value.
pub fn check_document(
    registry: &SchemaRegistry,
    document: &OutputDocument,
    explicit: Option<&str>,
) -> Result<CheckReport, ConformError> {
    let check_type = match explicit {
        Some(check_type) => check_type.to_string(),
        None => match document.get("check_type") {
            Some(Value::String(check_type)) => check_type.clone(),
            _ => {
                return Err(ConformError::InputUsage(
                    "document has no string `check_type`; pass --check-type".to_string(),
                ));
            }
        },
    };
    let fields = registry
        .fields_for(&check_type)
        .map_err(|error| ConformError::InputUsage(error.to_string()))?;

    let schema = document_schema(&check_type, &fields);
    let validator = validator_for(&schema)
        .map_err(|error| ConformError::Internal(format!("invalid derived schema: {error}")))?;

    let instance = Value::Object(document.clone());
    let mut mismatches = Vec::new();
    for error in validator.iter_errors(&instance) {
        let instance_pointer = error.instance_path().as_str().to_string();
        mismatches.push(MismatchEntry {
            path: document_path(&instance_pointer),
            reason: "schema_mismatch".to_string(),
            actual: value_at_pointer(&instance, &instance_pointer),
            expected: json!({
                "schema_path": error.schema_path().as_str(),
                "message": error.to_string()
            }),
        });
    }

    for (name, descriptor) in fields.iter() {
        if !matches!(descriptor.kind, FieldKind::Expression { .. }) {
            continue;
        }
        let Some(Value::String(text)) = document.get(name) else {
            continue;
        };
        if let ExpressionCheck::Invalid(message) = check_expression(text) {
            mismatches.push(MismatchEntry {
                path: format!("$.{name}"),
                reason: "expression_syntax".to_string(),
                actual: Value::String(text.clone()),
                expected: json!({"message": message}),
            });
        }
    }

    sort_mismatches(&mut mismatches);

    Ok(CheckReport {
        check_type,
        matched: mismatches.is_empty(),
        mismatch_count: mismatches.len(),
        mismatches,
    })
}

fn value_at_pointer(root: &Value, pointer: &str) -> Value {
    if pointer.is_empty() {
        return root.clone();
    }
    root.pointer(pointer).cloned().unwrap_or(Value::Null)
}

fn document_path(pointer: &str) -> String {
    let mut path = "$".to_string();
    if pointer.is_empty() {
        return path;
    }
    for token in pointer.trim_start_matches('/').split('/') {
        let segment = token.replace("~1", "/").replace("~0", "~");
        path.push('.');
        path.push_str(&segment);
    }
    path
}

fn sort_mismatches(mismatches: &mut [MismatchEntry]) {
    mismatches.sort_by(|left, right| {
        let left_key = (&left.path, &left.reason, stable_value_key(&left.expected));
        let right_key = (&right.path, &right.reason, stable_value_key(&right.expected));
        left_key.cmp(&right_key)
    });
}

fn stable_value_key(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<serialization-error>".to_string())
}
