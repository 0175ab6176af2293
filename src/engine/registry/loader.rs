//! Registry file format.
//!
//! ```yaml
//! core_fields:
//!   name: {type: string, required: true}
//! check_types:
//!   postproc_results:
//!     fields:
//!       stat: {type: expression, placeholder: "e.g. data.valid"}
//! ```
//!
//! Field tables keep their declaration order. Every malformed entry is a
//! [`SchemaError`]; nothing is silently skipped.

use std::fs::File;
use std::path::Path;

use serde_json::{Map, Value};

use crate::domain::error::SchemaError;
use crate::domain::schema::{FieldDescriptor, FieldSet};
use crate::io::{self, IoError};

use super::{SchemaRegistry, generator_by_name};

const COMMON_ATTRIBUTES: &[&str] = &["type", "required", "optional"];
const FIXED_ATTRIBUTES: &[&str] = &["value", "value_from_parent"];
const TEXT_ATTRIBUTES: &[&str] = &["placeholder", "default"];
const SELECT_ATTRIBUTES: &[&str] = &["options", "default"];

pub fn load_path(path: &Path) -> Result<SchemaRegistry, SchemaError> {
    let load_error = |source: IoError| SchemaError::Load {
        path: path.display().to_string(),
        source,
    };
    let format = io::resolve_input_format(None, Some(path)).map_err(load_error)?;
    let file = File::open(path).map_err(|err| load_error(IoError::Io(err)))?;
    let object = io::reader::read_object(file, format).map_err(load_error)?;
    from_object(&object)
}

/// Builds a registry from a parsed registry document.
pub fn from_object(object: &Map<String, Value>) -> Result<SchemaRegistry, SchemaError> {
    for section in object.keys() {
        if section != "core_fields" && section != "check_types" {
            return Err(SchemaError::UnknownSection {
                section: section.clone(),
            });
        }
    }

    let core = match object.get("core_fields") {
        Some(value) => parse_field_table("core_fields", None, value)?,
        None => FieldSet::new(),
    };
    let check_types = match object.get("check_types") {
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(SchemaError::InvalidSection {
                section: "check_types".to_string(),
            });
        }
        None => return Err(SchemaError::NoCheckTypes),
    };
    if check_types.is_empty() {
        return Err(SchemaError::NoCheckTypes);
    }

    let mut registry = SchemaRegistry::new(core);
    for (name, definition) in check_types {
        let section = format!("check_types.{name}");
        let Value::Object(definition) = definition else {
            return Err(SchemaError::InvalidSection { section });
        };
        if let Some(key) = definition.keys().find(|key| key.as_str() != "fields") {
            return Err(SchemaError::UnknownSection {
                section: format!("{section}.{key}"),
            });
        }
        let fields = match definition.get("fields") {
            Some(value) => parse_field_table(&format!("{section}.fields"), Some(name.as_str()), value)?,
            None => FieldSet::new(),
        };
        registry = registry.with_check_type(name.clone(), fields);
    }
    Ok(registry)
}

fn parse_field_table(
    section: &str,
    check_type: Option<&str>,
    value: &Value,
) -> Result<FieldSet, SchemaError> {
    let Value::Object(table) = value else {
        return Err(SchemaError::InvalidSection {
            section: section.to_string(),
        });
    };
    let mut fields = FieldSet::new();
    for (name, raw) in table {
        let qualified = match check_type {
            Some(check_type) => format!("{check_type}.{name}"),
            None => name.clone(),
        };
        fields.insert(name.clone(), parse_descriptor(&qualified, raw)?);
    }
    Ok(fields)
}

fn parse_descriptor(field: &str, raw: &Value) -> Result<FieldDescriptor, SchemaError> {
    let Value::Object(attributes) = raw else {
        return Err(SchemaError::InvalidDescriptor {
            field: field.to_string(),
        });
    };
    let kind = match attributes.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(_) => {
            return Err(SchemaError::InvalidAttribute {
                field: field.to_string(),
                attribute: "type",
                expected: "a string",
            });
        }
        None => {
            return Err(SchemaError::MissingKind {
                field: field.to_string(),
            });
        }
    };

    let kind_attributes = match kind {
        "fixed" => FIXED_ATTRIBUTES,
        "string" | "expression" => TEXT_ATTRIBUTES,
        "select" => SELECT_ATTRIBUTES,
        other => {
            return Err(SchemaError::UnknownKind {
                field: field.to_string(),
                kind: other.to_string(),
            });
        }
    };
    if let Some(attribute) = attributes.keys().find(|key| {
        !COMMON_ATTRIBUTES.contains(&key.as_str()) && !kind_attributes.contains(&key.as_str())
    }) {
        return Err(SchemaError::UnexpectedAttribute {
            field: field.to_string(),
            kind: kind_label(kind),
            attribute: attribute.clone(),
        });
    }

    let mut descriptor = match kind {
        "fixed" => parse_fixed(field, attributes)?,
        "select" => parse_select(field, attributes)?,
        "string" => parse_text(field, attributes, FieldDescriptor::string())?,
        _ => parse_text(field, attributes, FieldDescriptor::expression())?,
    };

    if bool_attribute(field, attributes, "required")? {
        descriptor = descriptor.required();
    }
    if bool_attribute(field, attributes, "optional")? {
        descriptor = descriptor.optional();
    }
    Ok(descriptor)
}

fn parse_fixed(field: &str, attributes: &Map<String, Value>) -> Result<FieldDescriptor, SchemaError> {
    if bool_attribute(field, attributes, "value_from_parent")? {
        return Ok(FieldDescriptor::from_parent());
    }
    match string_attribute(field, attributes, "value")? {
        Some(value) => Ok(FieldDescriptor::fixed(value)),
        None => Err(SchemaError::MissingFixedValue {
            field: field.to_string(),
        }),
    }
}

fn parse_text(
    field: &str,
    attributes: &Map<String, Value>,
    mut descriptor: FieldDescriptor,
) -> Result<FieldDescriptor, SchemaError> {
    if let Some(placeholder) = string_attribute(field, attributes, "placeholder")? {
        descriptor = descriptor.placeholder(placeholder);
    }
    match attributes.get("default") {
        None => {}
        Some(Value::String(value)) => descriptor = descriptor.default_value(value.clone()),
        Some(Value::Object(spec)) if spec.len() == 1 => {
            let Some(Value::String(name)) = spec.get("generator") else {
                return Err(invalid_default(field));
            };
            let generator =
                generator_by_name(name).ok_or_else(|| SchemaError::UnknownGenerator {
                    field: field.to_string(),
                    generator: name.clone(),
                })?;
            descriptor = descriptor.default_generated(generator);
        }
        Some(_) => return Err(invalid_default(field)),
    }
    Ok(descriptor)
}

fn parse_select(
    field: &str,
    attributes: &Map<String, Value>,
) -> Result<FieldDescriptor, SchemaError> {
    let options = match attributes.get("options") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(option) => Ok(option.clone()),
                _ => Err(SchemaError::InvalidAttribute {
                    field: field.to_string(),
                    attribute: "options",
                    expected: "a list of strings",
                }),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(SchemaError::InvalidAttribute {
                field: field.to_string(),
                attribute: "options",
                expected: "a list of strings",
            });
        }
        None => Vec::new(),
    };
    if options.is_empty() {
        return Err(SchemaError::EmptyOptions {
            field: field.to_string(),
        });
    }
    let mut descriptor = FieldDescriptor::select(options);
    if let Some(default) = string_attribute(field, attributes, "default")? {
        descriptor = descriptor.default_value(default);
    }
    Ok(descriptor)
}

fn bool_attribute(
    field: &str,
    attributes: &Map<String, Value>,
    attribute: &'static str,
) -> Result<bool, SchemaError> {
    match attributes.get(attribute) {
        None => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(SchemaError::InvalidAttribute {
            field: field.to_string(),
            attribute,
            expected: "a boolean",
        }),
    }
}

fn string_attribute(
    field: &str,
    attributes: &Map<String, Value>,
    attribute: &'static str,
) -> Result<Option<String>, SchemaError> {
    match attributes.get(attribute) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(SchemaError::InvalidAttribute {
            field: field.to_string(),
            attribute,
            expected: "a string",
        }),
    }
}

fn kind_label(kind: &str) -> &'static str {
    match kind {
        "fixed" => "fixed",
        "select" => "select",
        "string" => "string",
        _ => "expression",
    }
}

fn invalid_default(field: &str) -> SchemaError {
    SchemaError::InvalidAttribute {
        field: field.to_string(),
        attribute: "default",
        expected: "a string or {generator: <name>}",
    }
}
