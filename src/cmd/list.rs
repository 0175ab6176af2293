use serde_json::Value;

use crate::cmd::{CommandOutput, CommandResponse};
use crate::engine::registry::SchemaRegistry;

/// Lists check-type names in registry order.
pub fn run(registry: &SchemaRegistry) -> CommandResponse {
    let names = registry
        .check_types()
        .into_iter()
        .map(|name| Value::String(name.to_string()))
        .collect();
    CommandResponse::success(CommandOutput::Json(Value::Array(names)))
}

/// Pipeline steps reported by `list`.
pub fn pipeline_steps() -> Vec<String> {
    vec!["load_registry".to_string(), "list_check_types".to_string()]
}

/// Determinism guards applied by `list`.
pub fn deterministic_guards() -> Vec<String> {
    vec!["registry_definition_order".to_string()]
}
