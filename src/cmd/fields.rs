use crate::cmd::{CommandError, CommandOutput, CommandResponse};
use crate::engine::registry::SchemaRegistry;

/// Shows the merged field descriptors of one check type, in render order.
pub fn run(registry: &SchemaRegistry, check_type: &str) -> CommandResponse {
    match registry.fields_for(check_type) {
        Ok(fields) => CommandResponse::success(CommandOutput::Json(fields.to_json())),
        Err(error) => {
            CommandResponse::failure(CommandError::InputUsage(error.to_string()), "fields")
        }
    }
}

/// Pipeline steps reported by `fields`.
pub fn pipeline_steps() -> Vec<String> {
    vec![
        "load_registry".to_string(),
        "merge_core_and_check_type_fields".to_string(),
    ]
}

/// Determinism guards applied by `fields`.
pub fn deterministic_guards() -> Vec<String> {
    vec![
        "field_declaration_order".to_string(),
        "check_type_fields_override_core_fields".to_string(),
    ]
}
