use thiserror::Error;

use crate::io::IoError;

/// Malformed schema registry definition. Fatal at startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Registry file could not be read.
    #[error("failed to load registry `{path}`: {source}")]
    Load {
        path: String,
        #[source]
        source: IoError,
    },

    #[error("registry section `{section}` must be an object")]
    InvalidSection { section: String },

    #[error("unknown registry section `{section}`")]
    UnknownSection { section: String },

    #[error("field `{field}` must be an object")]
    InvalidDescriptor { field: String },

    #[error("field `{field}` has unknown kind `{kind}`")]
    UnknownKind { field: String, kind: String },

    #[error("field `{field}` has no kind; set `type`")]
    MissingKind { field: String },

    #[error("field `{field}`: attribute `{attribute}` is not valid for kind `{kind}`")]
    UnexpectedAttribute {
        field: String,
        kind: &'static str,
        attribute: String,
    },

    #[error("field `{field}`: attribute `{attribute}` must be {expected}")]
    InvalidAttribute {
        field: String,
        attribute: &'static str,
        expected: &'static str,
    },

    #[error("select field `{field}` has no options")]
    EmptyOptions { field: String },

    #[error("fixed field `{field}` needs `value` or `value_from_parent: true`")]
    MissingFixedValue { field: String },

    #[error("field `{field}` references unknown default generator `{generator}`")]
    UnknownGenerator { field: String, generator: String },

    #[error("registry defines no check types")]
    NoCheckTypes,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown check type `{name}`; expected one of: {known}")]
    UnknownCheckType { name: String, known: String },
}

/// Errors raised while collecting field values.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown field `{field}` for check type `{check_type}`")]
    UnknownField { field: String, check_type: String },

    #[error("field `{field}` is fixed and cannot be set")]
    FixedField { field: String },

    #[error("invalid value `{value}` for field `{field}`; expected one of: {options}")]
    InvalidChoice {
        field: String,
        value: String,
        options: String,
    },

    #[error("value for field `{field}` must be a string")]
    NonStringValue { field: String },

    #[error("invalid assignment `{raw}`; expected key=value")]
    InvalidAssignment { raw: String },

    #[error("prompt io failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Host bridge failures. Recoverable: reported, never shown as sent.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("failed to parse assertion json: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("assertion json must be an object, got {actual}")]
    NotAnObject { actual: &'static str },

    #[error("failed to render bridge page: {0}")]
    Page(#[from] tera::Error),

    #[error("failed to serialize bridge message: {0}")]
    Serialize(#[source] serde_json::Error),
}
