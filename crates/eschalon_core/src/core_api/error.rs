use std::io;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    Truncated,
    InvalidValue,
    UnsupportedOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(CoreErrorCode::InvalidValue, message)
    }

    /// Classify a codec error and prefix it with what the caller was doing.
    pub fn from_io(err: io::Error, context: &str) -> Self {
        let code = match err.kind() {
            io::ErrorKind::UnexpectedEof => CoreErrorCode::Truncated,
            io::ErrorKind::InvalidInput => CoreErrorCode::InvalidValue,
            _ => CoreErrorCode::Io,
        };
        Self::new(code, format!("{context}: {err}"))
    }
}
