use std::fmt;

use serde_json::{Map, Value, json};

/// Named factory for defaults that must be generated fresh on every render.
#[derive(Clone, Copy)]
pub struct DefaultGenerator {
    name: &'static str,
    factory: fn() -> String,
}

impl DefaultGenerator {
    pub const fn new(name: &'static str, factory: fn() -> String) -> Self {
        Self { name, factory }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn generate(&self) -> String {
        (self.factory)()
    }
}

impl fmt::Debug for DefaultGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefaultGenerator").field(&self.name).finish()
    }
}

impl PartialEq for DefaultGenerator {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for DefaultGenerator {}

/// Default for a free-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Literal(String),
    Generated(DefaultGenerator),
}

impl DefaultValue {
    /// Produces the default text. Generated defaults yield a new value per call.
    pub fn resolve(&self) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Generated(generator) => generator.generate(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Literal(value) => Value::String(value.clone()),
            Self::Generated(generator) => json!({"generator": generator.name()}),
        }
    }
}

/// Source of a `fixed` field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedValue {
    Literal(String),
    /// Takes the name of the selected check type.
    FromParent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Fixed(FixedValue),
    String {
        placeholder: Option<String>,
        default: Option<DefaultValue>,
    },
    Select {
        options: Vec<String>,
        default: Option<String>,
    },
    Expression {
        placeholder: Option<String>,
        default: Option<DefaultValue>,
    },
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::String { .. } => "string",
            Self::Select { .. } => "select",
            Self::Expression { .. } => "expression",
        }
    }
}

/// Metadata for one configurable input of an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub required: bool,
    pub optional: bool,
}

impl FieldDescriptor {
    fn with_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
        }
    }

    pub fn string() -> Self {
        Self::with_kind(FieldKind::String {
            placeholder: None,
            default: None,
        })
    }

    pub fn expression() -> Self {
        Self::with_kind(FieldKind::Expression {
            placeholder: None,
            default: None,
        })
    }

    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(FieldKind::Select {
            options: options.into_iter().map(Into::into).collect(),
            default: None,
        })
    }

    pub fn fixed(value: impl Into<String>) -> Self {
        Self::with_kind(FieldKind::Fixed(FixedValue::Literal(value.into())))
    }

    pub fn from_parent() -> Self {
        Self::with_kind(FieldKind::Fixed(FixedValue::FromParent))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Sets the placeholder hint. Ignored for `fixed` and `select` fields.
    pub fn placeholder(mut self, hint: impl Into<String>) -> Self {
        match &mut self.kind {
            FieldKind::String { placeholder, .. } | FieldKind::Expression { placeholder, .. } => {
                *placeholder = Some(hint.into());
            }
            FieldKind::Fixed(_) | FieldKind::Select { .. } => {}
        }
        self
    }

    /// Sets a constant default. For `select` fields this is the default option.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        match &mut self.kind {
            FieldKind::String { default, .. } | FieldKind::Expression { default, .. } => {
                *default = Some(DefaultValue::Literal(value));
            }
            FieldKind::Select { default, .. } => *default = Some(value),
            FieldKind::Fixed(_) => {}
        }
        self
    }

    /// Sets a default produced by `generator` once per render.
    pub fn default_generated(mut self, generator: DefaultGenerator) -> Self {
        match &mut self.kind {
            FieldKind::String { default, .. } | FieldKind::Expression { default, .. } => {
                *default = Some(DefaultValue::Generated(generator));
            }
            FieldKind::Fixed(_) | FieldKind::Select { .. } => {}
        }
        self
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, FieldKind::Fixed(_))
    }

    /// JSON view used by the `fields` command and the registry file format.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), Value::String(self.kind.as_str().to_string()));
        match &self.kind {
            FieldKind::Fixed(FixedValue::Literal(value)) => {
                out.insert("value".to_string(), Value::String(value.clone()));
            }
            FieldKind::Fixed(FixedValue::FromParent) => {
                out.insert("value_from_parent".to_string(), Value::Bool(true));
            }
            FieldKind::String {
                placeholder,
                default,
            }
            | FieldKind::Expression {
                placeholder,
                default,
            } => {
                if let Some(placeholder) = placeholder {
                    out.insert("placeholder".to_string(), Value::String(placeholder.clone()));
                }
                if let Some(default) = default {
                    out.insert("default".to_string(), default.to_json());
                }
            }
            FieldKind::Select { options, default } => {
                out.insert(
                    "options".to_string(),
                    Value::Array(options.iter().cloned().map(Value::String).collect()),
                );
                if let Some(default) = default {
                    out.insert("default".to_string(), Value::String(default.clone()));
                }
            }
        }
        if self.required {
            out.insert("required".to_string(), Value::Bool(true));
        }
        if self.optional {
            out.insert("optional".to_string(), Value::Bool(true));
        }
        Value::Object(out)
    }
}

/// Ordered, name-unique collection of field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    entries: Vec<(String, FieldDescriptor)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field. An existing entry with the same name is replaced in place.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = descriptor,
            None => self.entries.push((name, descriptor)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Returns `self` overlaid with `other`; entries of `other` win on name collision.
    pub fn overlay(&self, other: &FieldSet) -> FieldSet {
        let mut merged = self.clone();
        for (name, descriptor) in &other.entries {
            merged.insert(name.clone(), descriptor.clone());
        }
        merged
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.entries
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (name, descriptor) in &self.entries {
            out.insert(name.clone(), descriptor.to_json());
        }
        Value::Object(out)
    }
}
