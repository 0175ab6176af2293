use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use miqa_assert::cmd::build::{BuildCommandArgs, BuildOutputKind};
use miqa_assert::cmd::{
    CommandOutput, CommandResponse, bridge, build, check, error_record, fields, list,
};
use miqa_assert::domain::report::{PipelineInput, PipelineInputSource, PipelineReport};
use miqa_assert::engine::registry::SchemaRegistry;
use miqa_assert::io::{self as miqa_io, Format, IoError, writer};
use serde_json::json;

#[derive(Debug, Parser)]
#[command(
    name = "miqa-assert",
    version,
    about = "Schema-driven assertion builder"
)]
struct Cli {
    /// Registry file (json, yaml or toml) replacing the built-in check types.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    emit_pipeline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List assertion check types.
    List,
    /// Show the fields of one check type.
    Fields(FieldsArgs),
    /// Build an assertion document.
    Build(BuildArgs),
    /// Wrap a displayed assertion in a host message or page.
    Bridge(BridgeArgs),
    /// Check an assertion document against its check type.
    Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
struct FieldsArgs {
    #[arg(long)]
    check_type: String,
}

#[derive(Debug, clap::Args)]
struct BuildArgs {
    #[arg(long)]
    check_type: String,

    /// Field value as key=value; repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,

    /// Values file (json, yaml or toml object).
    #[arg(long)]
    values: Option<PathBuf>,

    /// Prompt for each field on the terminal.
    #[arg(long, default_value_t = false)]
    interactive: bool,

    #[arg(long, value_enum, default_value_t = CliBuildOutput::Document)]
    output: CliBuildOutput,
}

#[derive(Debug, clap::Args)]
struct BridgeArgs {
    #[arg(long)]
    input: Option<PathBuf>,

    /// Emit the companion HTML page instead of the message.
    #[arg(long, default_value_t = false)]
    page: bool,
}

#[derive(Debug, clap::Args)]
struct CheckArgs {
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    check_type: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBuildOutput {
    Document,
    Message,
    Page,
}

impl From<CliBuildOutput> for BuildOutputKind {
    fn from(value: CliBuildOutput) -> Self {
        match value {
            CliBuildOutput::Document => Self::Document,
            CliBuildOutput::Message => Self::Message,
            CliBuildOutput::Page => Self::Page,
        }
    }
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    let registry = match load_registry(cli.registry.as_deref()) {
        Ok(registry) => registry,
        Err(code) => return code,
    };

    let stdin = io::stdin();
    let (response, report) = match &cli.command {
        Commands::List => (
            list::run(&registry),
            pipeline_report(
                "list",
                &cli,
                Vec::new(),
                list::pipeline_steps(),
                list::deterministic_guards(),
            ),
        ),
        Commands::Fields(args) => (
            fields::run(&registry, &args.check_type),
            pipeline_report(
                "fields",
                &cli,
                Vec::new(),
                fields::pipeline_steps(),
                fields::deterministic_guards(),
            ),
        ),
        Commands::Build(args) => {
            let command_args = BuildCommandArgs {
                check_type: args.check_type.clone(),
                assignments: args.assignments.clone(),
                values: args.values.clone(),
                interactive: args.interactive,
                output: args.output.into(),
            };
            let response = build::run_with_io(&registry, &command_args, stdin.lock(), io::stderr());
            (
                response,
                pipeline_report(
                    "build",
                    &cli,
                    build_sources(args),
                    build::pipeline_steps(),
                    build::deterministic_guards(),
                ),
            )
        }
        Commands::Bridge(args) => {
            let command_args = bridge::BridgeCommandArgs {
                input: args.input.clone(),
                page: args.page,
            };
            (
                bridge::run_with_stdin(&command_args, stdin.lock()),
                pipeline_report(
                    "bridge",
                    &cli,
                    vec![document_source(args.input.as_deref())],
                    bridge::pipeline_steps(),
                    bridge::deterministic_guards(),
                ),
            )
        }
        Commands::Check(args) => {
            let command_args = check::CheckCommandArgs {
                input: args.input.clone(),
                check_type: args.check_type.clone(),
            };
            (
                check::run_with_stdin(&registry, &command_args, stdin.lock()),
                pipeline_report(
                    "check",
                    &cli,
                    vec![document_source(args.input.as_deref())],
                    check::pipeline_steps(),
                    check::deterministic_guards(),
                ),
            )
        }
    };

    let exit_code = emit_response(response);
    if cli.emit_pipeline {
        emit_json_stderr(&report);
    }
    exit_code
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_json_stderr(&error_record(
                "input_usage_error",
                error.to_string(),
                3,
                json!({"kind": "cli_parse_error"}),
            ));
            3
        }
    }
}

/// A malformed registry stops the process before any command runs.
fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry, i32> {
    let Some(path) = path else {
        return Ok(SchemaRegistry::builtin().clone());
    };
    SchemaRegistry::load(path).map_err(|error| {
        emit_json_stderr(&error_record(
            "config_error",
            error.to_string(),
            3,
            json!({"registry": path}),
        ));
        3
    })
}

fn emit_response(response: CommandResponse) -> i32 {
    let stdout_ok = match &response.stdout {
        None => true,
        Some(output) => write_stdout(output),
    };
    for record in &response.stderr {
        emit_json_stderr(record);
    }
    if stdout_ok {
        response.exit_code
    } else {
        emit_json_stderr(&error_record(
            "internal_error",
            "failed to write command output".to_string(),
            1,
            json!({}),
        ));
        1
    }
}

fn write_stdout(output: &CommandOutput) -> bool {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let written = match output {
        CommandOutput::Json(value) => writer::write_json_line(&mut handle, value),
        CommandOutput::PrettyJson(value) => writer::write_pretty_json(&mut handle, value),
        CommandOutput::Text(text) => handle.write_all(text.as_bytes()).map_err(IoError::from),
    };
    written
        .and_then(|()| handle.flush().map_err(IoError::from))
        .is_ok()
}

fn emit_json_stderr<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize stderr record\",\"code\":1}}"
        ),
    }
}

fn pipeline_report(
    command: &str,
    cli: &Cli,
    mut sources: Vec<PipelineInputSource>,
    steps: Vec<String>,
    guards: Vec<String>,
) -> PipelineReport {
    let registry_source = match &cli.registry {
        Some(path) => PipelineInputSource::path(
            "registry",
            path.display().to_string(),
            format_label(path),
        ),
        None => PipelineInputSource::builtin("registry"),
    };
    sources.insert(0, registry_source);
    PipelineReport::new(command, PipelineInput::new(sources), steps, guards)
}

fn build_sources(args: &BuildArgs) -> Vec<PipelineInputSource> {
    let mut sources = Vec::new();
    if let Some(path) = &args.values {
        sources.push(PipelineInputSource::path(
            "values",
            path.display().to_string(),
            format_label(path),
        ));
    }
    if !args.assignments.is_empty() {
        sources.push(PipelineInputSource::flags("assignments"));
    }
    if args.interactive {
        sources.push(PipelineInputSource::stdin("answers", None));
    }
    sources
}

fn document_source(path: Option<&Path>) -> PipelineInputSource {
    match path {
        Some(path) => PipelineInputSource::path(
            "document",
            path.display().to_string(),
            format_label(path),
        ),
        None => PipelineInputSource::stdin("document", Some(Format::Json.as_str())),
    }
}

fn format_label(path: &Path) -> Option<&'static str> {
    miqa_io::resolve_input_format(None, Some(path))
        .ok()
        .map(Format::as_str)
}
