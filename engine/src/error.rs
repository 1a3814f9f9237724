//! Error types for the Quotebook engine.

use thiserror::Error;

/// All possible errors from the Quotebook engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("Please fill out both fields. ({0} is empty)")]
    EmptyField(&'static str),

    // Import errors
    #[error("invalid import: expected an array of quotes")]
    ImportNotArray,

    #[error("invalid import: {0}")]
    InvalidImport(String),

    // State errors
    #[error("persisted state is corrupt under '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the error was caused by user input rather than by storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyField(_) | Error::ImportNotArray | Error::InvalidImport(_)
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::EmptyField("text");
        assert_eq!(
            err.to_string(),
            "Please fill out both fields. (text is empty)"
        );

        let err = Error::ImportNotArray;
        assert_eq!(
            err.to_string(),
            "invalid import: expected an array of quotes"
        );

        let err = Error::CorruptState {
            key: "quotes".into(),
            reason: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "persisted state is corrupt under 'quotes': expected value at line 1 column 1"
        );
    }

    #[test]
    fn user_errors() {
        assert!(Error::EmptyField("category").is_user_error());
        assert!(Error::ImportNotArray.is_user_error());
        assert!(Error::InvalidImport("eof".into()).is_user_error());
        assert!(!Error::Storage("disk full".into()).is_user_error());
    }
}
