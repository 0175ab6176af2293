use rustpython_parser::{Mode, parse};

/// Note attached to expressions that parse; parsing says nothing about the data.
pub const SYNTAX_ONLY_NOTE: &str = "Syntactically valid expression (this may still not be a valid expression for your specific dataset; try the assertion to confirm).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionCheck {
    /// Blank input; nothing to check.
    Empty,
    Valid,
    Invalid(String),
}

/// Parses `text` as a single expression without evaluating it.
pub fn check_expression(text: &str) -> ExpressionCheck {
    if text.trim().is_empty() {
        return ExpressionCheck::Empty;
    }
    match parse(text, Mode::Expression, "<expression>") {
        Ok(_) => ExpressionCheck::Valid,
        Err(error) => ExpressionCheck::Invalid(error.error.to_string()),
    }
}
