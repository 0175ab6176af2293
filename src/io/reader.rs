use std::io::Read;

use serde_json::{Map, Value};

use crate::io::format::{json, toml, yaml};
use crate::io::{Format, IoError};

pub fn read_value<R: Read>(reader: R, format: Format) -> Result<Value, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
        Format::Toml => toml::read_toml(reader),
    }
}

/// Reads a single top-level object, keeping key order.
pub fn read_object<R: Read>(reader: R, format: Format) -> Result<Map<String, Value>, IoError> {
    match read_value(reader, format)? {
        Value::Object(map) => Ok(map),
        _ => Err(IoError::NotAnObject {
            format: format.as_str(),
        }),
    }
}
