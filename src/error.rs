//! Error types for the engine.

use thiserror::Error;

/// Main error type for the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Name or handle lookup miss (object, axis, event, property, stage)
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Rejected input: non-monotonic data, empty paths, malformed modifiers
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not allowed in the current state (e.g. object checked out by the frame loop)
    #[error("State error: {0}")]
    State(String),

    /// Unrecoverable startup failure
    #[error("Setup error: {0}")]
    Setup(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config parse errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias using the engine's error type.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_key() {
        let err = EngineError::not_found("object", "lamp");
        assert_eq!(err.to_string(), "object 'lamp' not found");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
