use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("could not resolve {kind} format; use a .json, .yaml, .yml or .toml file")]
    UnresolvedFormat { kind: &'static str },

    #[error("unsupported {kind} file extension: {path}")]
    UnsupportedPathExtension { kind: &'static str, path: String },

    #[error("json parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("yaml parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected a single {format} object")]
    NotAnObject { format: &'static str },
}
