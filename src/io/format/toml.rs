use std::io::Read;

use serde_json::Value;

use crate::io::IoError;

pub fn read_toml<R: Read>(mut reader: R) -> Result<Value, IoError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(::toml::from_str(&text)?)
}
