//! Error handling module for StreamSplit

use thiserror::Error;

/// Main error type for StreamSplit operations
#[derive(Error, Debug)]
pub enum SplitError {
    /// Unparseable duration expression
    #[error("Invalid time format: {input}. Expected seconds, units (e.g. 1h30m), or HH:MM:SS")]
    InvalidTimeFormat { input: String },

    /// Out-of-range or missing configuration field
    #[error("Configuration error: {message}")]
    ConfigValidation { message: String },

    /// Concatenation inputs failed the compatibility check
    #[error("Media files are not compatible for concatenation: {reason}")]
    IncompatibleMedia { reason: String },

    /// External tool could not extract metadata
    #[error("Failed to probe media file {path}: {message}")]
    Probe { path: String, message: String },

    /// External tool invocation failed
    #[error("{context}: {}", stderr.as_deref().unwrap_or("no diagnostic output"))]
    Process {
        context: String,
        stderr: Option<String>,
    },

    /// Required external tool is not on PATH
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    /// Run was cancelled before completion
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SplitError {
    /// Create a config validation error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a probe error.
    pub fn probe(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a process error carrying the tool's diagnostic stream.
    pub fn process(context: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Process {
            context: context.into(),
            stderr,
        }
    }
}

/// Result type alias for StreamSplit operations
pub type SplitResult<T> = std::result::Result<T, SplitError>;
