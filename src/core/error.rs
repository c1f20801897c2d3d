//! Error types for the logger hierarchy

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The root logger must always resolve to a concrete level
    #[error("Root logger level cannot be unset")]
    InvalidRootLevel,

    /// Unrecognized level name
    #[error("Invalid log level: '{name}'")]
    InvalidLevel { name: String },

    /// Output declaration with missing options or an unknown kind
    #[error("Invalid options for '{kind}' output: {message}")]
    InvalidOutputOptions { kind: String, message: String },

    /// Malformed logger name pattern
    #[error("Invalid logger name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// IO error, surfaced unchanged
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML configuration error
    #[error("YAML error: {message}")]
    YamlError { message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(name: impl Into<String>) -> Self {
        LoggerError::InvalidLevel { name: name.into() }
    }

    /// Create an invalid output options error
    pub fn output_options(kind: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidOutputOptions {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an invalid pattern error
    pub fn pattern(pattern: impl Into<String>, source: globset::Error) -> Self {
        LoggerError::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a YAML error
    pub fn yaml(message: impl Into<String>) -> Self {
        LoggerError::YamlError {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
