use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has neither an `openapi` nor a `swagger` field")]
    MissingVersion,

    #[error("invalid version field: {0}")]
    InvalidVersion(String),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error("document root must be an object")]
    NotAnObject,
}

/// Invariant violations detected while decoding the typed model.
///
/// These surface through serde as custom errors, so callers usually see them
/// wrapped in [`ParseError::Json`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("`{0}` and `{1}` are mutually exclusive")]
    MutuallyExclusive(&'static str, &'static str),

    #[error("one of `{0}` or `{1}` is required")]
    MissingOneOf(&'static str, &'static str),

    #[error("`content` must contain exactly one entry, found {0}")]
    ContentEntryCount(usize),

    #[error("expected `true`, found `false`")]
    ExpectedTrue,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml_ng::Error,
    },
}
