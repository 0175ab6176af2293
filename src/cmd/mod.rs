pub mod bridge;
pub mod build;
pub mod check;
pub mod fields;
pub mod list;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use serde_json::{Value, json};

use crate::io::{self, Format, IoError};

/// What a command writes to stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Single-line JSON.
    Json(Value),
    /// JSON indented with 2 spaces.
    PrettyJson(Value),
    Text(String),
}

/// Exit code, stdout payload and structured stderr records of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub exit_code: i32,
    pub stdout: Option<CommandOutput>,
    pub stderr: Vec<Value>,
}

impl CommandResponse {
    pub fn success(output: CommandOutput) -> Self {
        Self {
            exit_code: 0,
            stdout: Some(output),
            stderr: Vec::new(),
        }
    }

    pub fn failure(error: CommandError, command: &'static str) -> Self {
        let (kind, code, message) = match error {
            CommandError::InputUsage(message) => ("input_usage_error", 3, message),
            CommandError::Internal(message) => ("internal_error", 1, message),
        };
        Self {
            exit_code: code,
            stdout: None,
            stderr: vec![error_record(kind, message, code, json!({"command": command}))],
        }
    }

    pub fn with_stderr(mut self, record: Value) -> Self {
        self.stderr.push(record);
        self
    }
}

/// Command failure split by exit-code class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    InputUsage(String),
    Internal(String),
}

impl From<IoError> for CommandError {
    fn from(error: IoError) -> Self {
        match error {
            IoError::Io(source) => Self::Internal(source.to_string()),
            other => Self::InputUsage(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorRecord<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

/// Structured stderr record for a failure.
pub fn error_record(kind: &str, message: String, code: i32, details: Value) -> Value {
    serde_json::to_value(ErrorRecord {
        error: kind,
        message,
        code,
        details,
    })
    .unwrap_or_else(|_| json!({"error": "internal_error", "message": "failed to serialize error", "code": 1}))
}

/// Reads a whole input from `path`, or from `stdin` when no path is given.
pub(crate) fn read_text<R: Read>(path: Option<&Path>, mut stdin: R) -> Result<String, CommandError> {
    let mut text = String::new();
    match path {
        Some(path) => {
            let mut file = File::open(path).map_err(|err| {
                CommandError::InputUsage(format!(
                    "failed to open input file `{}`: {err}",
                    path.display()
                ))
            })?;
            file.read_to_string(&mut text).map_err(|err| {
                CommandError::InputUsage(format!(
                    "failed to read input file `{}`: {err}",
                    path.display()
                ))
            })?;
        }
        None => {
            stdin
                .read_to_string(&mut text)
                .map_err(|err| CommandError::Internal(format!("failed to read stdin: {err}")))?;
        }
    }
    Ok(text)
}

/// Reads one JSON/YAML/TOML object from `path`, keeping key order.
pub(crate) fn read_object_file(
    path: &Path,
) -> Result<serde_json::Map<String, Value>, CommandError> {
    let format: Format = io::resolve_input_format(None, Some(path))?;
    let file = File::open(path).map_err(|err| {
        CommandError::InputUsage(format!(
            "failed to open input file `{}`: {err}",
            path.display()
        ))
    })?;
    io::reader::read_object(file, format).map_err(|err| {
        CommandError::InputUsage(format!("failed to read `{}`: {err}", path.display()))
    })
}
