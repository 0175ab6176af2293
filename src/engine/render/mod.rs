pub mod input;

use serde_json::Value;

use crate::domain::document::{FieldDiagnostic, RenderOutcome};
use crate::domain::error::InputError;
use crate::domain::schema::{DefaultValue, FieldKind, FieldSet, FixedValue};
use crate::engine::expression::{ExpressionCheck, SYNTAX_ONLY_NOTE, check_expression};

pub use input::{ChoicePrompt, FieldInput, PresetInput, PromptInput, TextPrompt};

/// Renders one form pass over `fields` for the selected `check_type`.
///
/// Fields are visited in order. Generated defaults are produced once here, so
/// two passes differ only in those values. Expression syntax errors become
/// diagnostics and never stop the pass.
pub fn render<I: FieldInput + ?Sized>(
    check_type: &str,
    fields: &FieldSet,
    input: &mut I,
) -> Result<RenderOutcome, InputError> {
    let mut outcome = RenderOutcome::default();

    for (name, descriptor) in fields.iter() {
        let value = match &descriptor.kind {
            FieldKind::Fixed(fixed) => {
                let value = match fixed {
                    FixedValue::Literal(value) => value.clone(),
                    FixedValue::FromParent => check_type.to_string(),
                };
                outcome.document.insert(name.to_string(), Value::String(value));
                continue;
            }
            FieldKind::String {
                placeholder,
                default,
            } => input.text(&TextPrompt {
                field: name,
                default: &resolve_default(default.as_ref()),
                placeholder: placeholder.as_deref(),
                expression: false,
                required: descriptor.required,
            })?,
            FieldKind::Expression {
                placeholder,
                default,
            } => {
                let value = input.text(&TextPrompt {
                    field: name,
                    default: &resolve_default(default.as_ref()),
                    placeholder: placeholder.as_deref(),
                    expression: true,
                    required: descriptor.required,
                })?;
                let diagnostic = match check_expression(&value) {
                    ExpressionCheck::Empty => None,
                    ExpressionCheck::Valid => Some(FieldDiagnostic::info(name, SYNTAX_ONLY_NOTE)),
                    ExpressionCheck::Invalid(message) => Some(FieldDiagnostic::error(
                        name,
                        format!("Invalid expression: {message}"),
                    )),
                };
                if let Some(diagnostic) = diagnostic {
                    input.report(&diagnostic)?;
                    outcome.diagnostics.push(diagnostic);
                }
                value
            }
            FieldKind::Select { options, default } => input.choose(&ChoicePrompt {
                field: name,
                options,
                default_index: default_index(options, default.as_deref()),
                required: descriptor.required,
            })?,
        };

        if !value.is_empty() || descriptor.optional {
            outcome.document.insert(name.to_string(), Value::String(value));
        }
    }

    Ok(outcome)
}

fn resolve_default(default: Option<&DefaultValue>) -> String {
    default.map(DefaultValue::resolve).unwrap_or_default()
}

/// Position of `default` among `options`, or the first option when absent or unknown.
pub fn default_index(options: &[String], default: Option<&str>) -> usize {
    default
        .and_then(|default| options.iter().position(|option| option == default))
        .unwrap_or(0)
}
