use std::io::Read;
use std::path::PathBuf;

use serde_json::json;

use crate::cmd::{CommandOutput, CommandResponse, error_record, read_text};
use crate::domain::error::BridgeError;
use crate::engine::bridge::{self, SENT_NOTICE};

/// Input arguments for bridge command execution API.
#[derive(Debug, Clone, Default)]
pub struct BridgeCommandArgs {
    /// Displayed assertion JSON; stdin when absent.
    pub input: Option<PathBuf>,
    /// Emit the companion HTML page instead of the message.
    pub page: bool,
}

/// Forwards a displayed assertion to the host page.
///
/// Failures are reported as `bridge_error` records and never produce the
/// sent notice.
pub fn run_with_stdin<R: Read>(args: &BridgeCommandArgs, stdin: R) -> CommandResponse {
    let text = match read_text(args.input.as_deref(), stdin) {
        Ok(text) => text,
        Err(error) => return CommandResponse::failure(error, "bridge"),
    };
    match dispatch(&text, args.page) {
        Ok(CommandOutput::Text(page)) => CommandResponse::success(CommandOutput::Text(page)),
        Ok(output) => CommandResponse::success(output).with_stderr(json!({
            "notice": "assertion_sent",
            "message": SENT_NOTICE,
        })),
        Err(error) => CommandResponse {
            exit_code: 3,
            stdout: None,
            stderr: vec![error_record(
                "bridge_error",
                error.to_string(),
                3,
                json!({"command": "bridge"}),
            )],
        },
    }
}

fn dispatch(text: &str, page: bool) -> Result<CommandOutput, BridgeError> {
    if page {
        let document = bridge::parse_document(text)?;
        return bridge::render_page(&document).map(CommandOutput::Text);
    }
    let message = bridge::message_from_text(text)?;
    serde_json::to_value(&message)
        .map(CommandOutput::PrettyJson)
        .map_err(BridgeError::Serialize)
}

/// Pipeline steps reported by `bridge`.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "read_displayed_assertion".to_string(),
        "parse_assertion_json".to_string(),
        "wrap_host_message".to_string(),
    ]
}

/// Determinism guards applied by `bridge`.
pub fn deterministic_guards() -> Vec<String> {
    vec!["payload_equals_displayed_document".to_string()]
}
