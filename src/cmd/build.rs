use std::io::{BufRead, Write};
use std::path::PathBuf;

use serde_json::Value;

use crate::cmd::{CommandError, CommandOutput, CommandResponse, read_object_file};
use crate::domain::document::RenderOutcome;
use crate::domain::error::InputError;
use crate::engine::bridge::{self, HostMessage};
use crate::engine::registry::SchemaRegistry;
use crate::engine::render::{self, PresetInput, PromptInput};

/// Shape written to stdout by `build`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildOutputKind {
    #[default]
    Document,
    Message,
    Page,
}

/// Input arguments for build command execution API.
#[derive(Debug, Clone, Default)]
pub struct BuildCommandArgs {
    pub check_type: String,
    /// `key=value` assignments, applied after the values file.
    pub assignments: Vec<String>,
    pub values: Option<PathBuf>,
    pub interactive: bool,
    pub output: BuildOutputKind,
}

/// Renders one assertion.
///
/// Interactive mode reads answers from `stdin` and writes prompts to
/// `prompts`; otherwise both are unused.
pub fn run_with_io<R: BufRead, W: Write>(
    registry: &SchemaRegistry,
    args: &BuildCommandArgs,
    stdin: R,
    prompts: W,
) -> CommandResponse {
    let outcome = match execute(registry, args, stdin, prompts) {
        Ok(outcome) => outcome,
        Err(error) => return CommandResponse::failure(error, "build"),
    };

    let diagnostics: Vec<Value> = if args.interactive {
        Vec::new()
    } else {
        outcome
            .diagnostics
            .iter()
            .filter_map(|diagnostic| serde_json::to_value(diagnostic).ok())
            .collect()
    };

    let output = match args.output {
        BuildOutputKind::Document => Ok(CommandOutput::PrettyJson(Value::Object(
            outcome.document,
        ))),
        BuildOutputKind::Message => serde_json::to_value(HostMessage::apply_direct(
            outcome.document,
        ))
        .map(CommandOutput::PrettyJson)
        .map_err(|err| CommandError::Internal(format!("failed to serialize message: {err}"))),
        BuildOutputKind::Page => bridge::render_page(&outcome.document)
            .map(CommandOutput::Text)
            .map_err(|err| CommandError::Internal(err.to_string())),
    };

    match output {
        Ok(output) => {
            let mut response = CommandResponse::success(output);
            response.stderr = diagnostics;
            response
        }
        Err(error) => CommandResponse::failure(error, "build"),
    }
}

fn execute<R: BufRead, W: Write>(
    registry: &SchemaRegistry,
    args: &BuildCommandArgs,
    stdin: R,
    prompts: W,
) -> Result<RenderOutcome, CommandError> {
    let fields = registry
        .fields_for(&args.check_type)
        .map_err(|error| CommandError::InputUsage(error.to_string()))?;

    let mut preset = PresetInput::new();
    if let Some(path) = &args.values {
        let object = read_object_file(path)?;
        preset.apply_object(&object).map_err(map_input_error)?;
    }
    preset
        .apply_assignments(args.assignments.iter().map(String::as_str))
        .map_err(map_input_error)?;
    preset
        .ensure_editable(&args.check_type, &fields)
        .map_err(map_input_error)?;

    if args.interactive {
        if !preset.is_empty() {
            return Err(CommandError::InputUsage(
                "--interactive cannot be combined with --set or --values".to_string(),
            ));
        }
        let mut prompt = PromptInput::new(stdin, prompts);
        render::render(&args.check_type, &fields, &mut prompt).map_err(map_input_error)
    } else {
        render::render(&args.check_type, &fields, &mut preset).map_err(map_input_error)
    }
}

fn map_input_error(error: InputError) -> CommandError {
    match error {
        InputError::Prompt(source) => CommandError::Internal(format!("prompt io failed: {source}")),
        other => CommandError::InputUsage(other.to_string()),
    }
}

/// Pipeline steps reported by `build`.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "load_registry".to_string(),
        "merge_core_and_check_type_fields".to_string(),
        "collect_field_values".to_string(),
        "render_fields".to_string(),
        "check_expression_syntax".to_string(),
        "write_assertion".to_string(),
    ]
}

/// Determinism guards applied by `build`.
pub fn deterministic_guards() -> Vec<String> {
    vec![
        "field_declaration_order".to_string(),
        "generated_defaults_once_per_render".to_string(),
        "expression_parse_without_evaluation".to_string(),
    ]
}
