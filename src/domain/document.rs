use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generated assertion: field name to resolved value, in field declaration order.
pub type OutputDocument = Map<String, Value>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Error,
    Info,
}

/// Inline note attached to one field of a render pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDiagnostic {
    pub field: String,
    pub level: DiagnosticLevel,
    pub message: String,
}

impl FieldDiagnostic {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            level: DiagnosticLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutcome {
    pub document: OutputDocument,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl RenderOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.level == DiagnosticLevel::Error)
    }
}
