use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use serde_json::{Map, Value};

use crate::domain::document::{DiagnosticLevel, FieldDiagnostic};
use crate::domain::error::InputError;
use crate::domain::schema::FieldSet;

/// Free-text request for one `string` or `expression` field.
#[derive(Debug, Clone, Copy)]
pub struct TextPrompt<'a> {
    pub field: &'a str,
    pub default: &'a str,
    pub placeholder: Option<&'a str>,
    pub expression: bool,
    pub required: bool,
}

/// Choice request for one `select` field.
#[derive(Debug, Clone, Copy)]
pub struct ChoicePrompt<'a> {
    pub field: &'a str,
    pub options: &'a [String],
    pub default_index: usize,
    pub required: bool,
}

impl ChoicePrompt<'_> {
    fn default_option(&self) -> String {
        self.options
            .get(self.default_index)
            .cloned()
            .unwrap_or_default()
    }
}

/// Presentation layer consulted by the form engine for each editable field.
pub trait FieldInput {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Result<String, InputError>;

    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Result<String, InputError>;

    /// Shows a diagnostic next to the field it belongs to.
    fn report(&mut self, _diagnostic: &FieldDiagnostic) -> Result<(), InputError> {
        Ok(())
    }
}

/// Values supplied up front; unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetInput {
    values: BTreeMap<String, String>,
}

impl PresetInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Applies `key=value` assignments; later assignments win.
    pub fn apply_assignments<'a, I>(&mut self, assignments: I) -> Result<(), InputError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for raw in assignments {
            let Some((key, value)) = raw.split_once('=') else {
                return Err(InputError::InvalidAssignment {
                    raw: raw.to_string(),
                });
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(InputError::InvalidAssignment {
                    raw: raw.to_string(),
                });
            }
            self.set(key, value);
        }
        Ok(())
    }

    /// Applies a values file object. Every value must be a string.
    pub fn apply_object(&mut self, object: &Map<String, Value>) -> Result<(), InputError> {
        for (field, value) in object {
            let Value::String(value) = value else {
                return Err(InputError::NonStringValue {
                    field: field.clone(),
                });
            };
            self.set(field.clone(), value.clone());
        }
        Ok(())
    }

    /// Rejects values for fields the check type does not have or does not let users edit.
    pub fn ensure_editable(&self, check_type: &str, fields: &FieldSet) -> Result<(), InputError> {
        for field in self.values.keys() {
            match fields.get(field) {
                None => {
                    return Err(InputError::UnknownField {
                        field: field.clone(),
                        check_type: check_type.to_string(),
                    });
                }
                Some(descriptor) if descriptor.is_fixed() => {
                    return Err(InputError::FixedField {
                        field: field.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldInput for PresetInput {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Result<String, InputError> {
        Ok(self
            .values
            .get(prompt.field)
            .cloned()
            .unwrap_or_else(|| prompt.default.to_string()))
    }

    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Result<String, InputError> {
        match self.values.get(prompt.field) {
            None => Ok(prompt.default_option()),
            Some(value) if prompt.options.contains(value) => Ok(value.clone()),
            Some(value) => Err(InputError::InvalidChoice {
                field: prompt.field.to_string(),
                value: value.clone(),
                options: prompt.options.join(", "),
            }),
        }
    }
}

/// Line-oriented terminal prompts.
///
/// An empty answer keeps the default. For text fields a lone `-` clears the
/// value. End of input keeps the default for every remaining field.
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn read_answer(&mut self) -> Result<Option<String>, InputError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

impl<R: BufRead, W: Write> FieldInput for PromptInput<R, W> {
    fn text(&mut self, prompt: &TextPrompt<'_>) -> Result<String, InputError> {
        let marker = if prompt.required { " *" } else { "" };
        write!(self.writer, "{}{marker}", prompt.field)?;
        if prompt.expression {
            write!(self.writer, " (expression)")?;
        }
        if let Some(placeholder) = prompt.placeholder {
            write!(self.writer, " <{placeholder}>")?;
        }
        if !prompt.default.is_empty() {
            write!(self.writer, " [{}]", prompt.default)?;
        }
        write!(self.writer, ": ")?;
        self.writer.flush()?;

        Ok(match self.read_answer()? {
            None => {
                writeln!(self.writer)?;
                prompt.default.to_string()
            }
            Some(answer) if answer.is_empty() => prompt.default.to_string(),
            Some(answer) if answer == "-" => String::new(),
            Some(answer) => answer,
        })
    }

    fn choose(&mut self, prompt: &ChoicePrompt<'_>) -> Result<String, InputError> {
        let marker = if prompt.required { " *" } else { "" };
        writeln!(self.writer, "{}{marker}", prompt.field)?;
        for (index, option) in prompt.options.iter().enumerate() {
            let current = if index == prompt.default_index { "*" } else { " " };
            writeln!(self.writer, " {current}{:>3}) {option}", index + 1)?;
        }

        loop {
            write!(self.writer, "choice [{}]: ", prompt.default_index + 1)?;
            self.writer.flush()?;
            let answer = match self.read_answer()? {
                None => {
                    writeln!(self.writer)?;
                    return Ok(prompt.default_option());
                }
                Some(answer) => answer,
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(prompt.default_option());
            }
            if let Ok(number) = answer.parse::<usize>()
                && let Some(option) = number.checked_sub(1).and_then(|i| prompt.options.get(i))
            {
                return Ok(option.clone());
            }
            if let Some(option) = prompt.options.iter().find(|option| *option == answer) {
                return Ok(option.clone());
            }
            writeln!(
                self.writer,
                "invalid choice `{answer}`; enter 1-{} or an option name",
                prompt.options.len()
            )?;
        }
    }

    fn report(&mut self, diagnostic: &FieldDiagnostic) -> Result<(), InputError> {
        let label = match diagnostic.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Info => "note",
        };
        writeln!(self.writer, "  {label}: {}", diagnostic.message)?;
        Ok(())
    }
}
