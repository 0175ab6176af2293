use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;

use crate::cmd::{CommandError, CommandOutput, CommandResponse, read_object_file, read_text};
use crate::domain::document::OutputDocument;
use crate::domain::report::CheckReport;
use crate::engine::conform::{self, ConformError};
use crate::engine::registry::SchemaRegistry;

/// Input arguments for check command execution API.
#[derive(Debug, Clone, Default)]
pub struct CheckCommandArgs {
    /// JSON, YAML or TOML document; stdin JSON when absent.
    pub input: Option<PathBuf>,
    pub check_type: Option<String>,
}

pub fn run_with_stdin<R: Read>(
    registry: &SchemaRegistry,
    args: &CheckCommandArgs,
    stdin: R,
) -> CommandResponse {
    match execute(registry, args, stdin) {
        Ok(report) => report_response(report),
        Err(error) => CommandResponse::failure(error, "check"),
    }
}

fn report_response(report: CheckReport) -> CommandResponse {
    let exit_code = if report.matched { 0 } else { 2 };
    match serde_json::to_value(&report) {
        Ok(payload) => CommandResponse {
            exit_code,
            stdout: Some(CommandOutput::Json(payload)),
            stderr: Vec::new(),
        },
        Err(_) => CommandResponse::failure(
            CommandError::Internal("failed to serialize check report".to_string()),
            "check",
        ),
    }
}

fn execute<R: Read>(
    registry: &SchemaRegistry,
    args: &CheckCommandArgs,
    stdin: R,
) -> Result<CheckReport, CommandError> {
    let document = load_document(args, stdin)?;
    conform::check_document(registry, &document, args.check_type.as_deref()).map_err(
        |error| match error {
            ConformError::InputUsage(message) => CommandError::InputUsage(message),
            ConformError::Internal(message) => CommandError::Internal(message),
        },
    )
}

fn load_document<R: Read>(
    args: &CheckCommandArgs,
    stdin: R,
) -> Result<OutputDocument, CommandError> {
    if let Some(path) = &args.input {
        return read_object_file(path);
    }
    let text = read_text(None, stdin)?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(CommandError::InputUsage(
            "assertion document must be a json object".to_string(),
        )),
        Err(err) => Err(CommandError::InputUsage(format!(
            "failed to parse assertion json: {err}"
        ))),
    }
}

/// Pipeline steps reported by `check`.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "load_registry".to_string(),
        "read_assertion_document".to_string(),
        "derive_check_type_schema".to_string(),
        "validate_document_schema".to_string(),
        "check_expression_syntax".to_string(),
    ]
}

/// Determinism guards applied by `check`.
pub fn deterministic_guards() -> Vec<String> {
    vec![
        "deterministic_mismatch_ordering".to_string(),
        "expression_parse_without_evaluation".to_string(),
    ]
}
