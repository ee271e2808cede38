//! Portal error types with rich context

use std::path::PathBuf;
use thiserror::Error;

use crate::types::QuestionId;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Portal error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode {file_name}: {message}")]
    Encoding { file_name: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Validation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Questionnaire incomplete, missing answers for {} question(s)", .missing.len())]
    IncompleteQuestionnaire { missing: Vec<QuestionId> },

    #[error("Case is awaiting more information and cannot be edited")]
    ReadOnlyCase,

    // ─────────────────────────────────────────────────────────────
    // Upload Limit Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Too many files: {attempted} selected, at most {max} allowed")]
    FileCountExceeded { attempted: usize, max: usize },

    #[error("Total upload size {attempted_bytes} bytes exceeds {max_bytes} bytes")]
    TotalSizeExceeded { attempted_bytes: u64, max_bytes: u64 },

    #[error("File {file_name} is {size_bytes} bytes, larger than {max_bytes} bytes")]
    FileTooLarge {
        file_name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    #[error("No attachment at position {index}")]
    AttachmentNotFound { index: usize },

    // ─────────────────────────────────────────────────────────────
    // Remote Service Errors
    // ─────────────────────────────────────────────────────────────
    #[error("{message}")]
    RemoteService { operation: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Routing Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No site marker found in path: {path}")]
    RouteResolution { path: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn incomplete(missing: impl IntoIterator<Item = QuestionId>) -> Self {
        Self::IncompleteQuestionnaire {
            missing: missing.into_iter().collect(),
        }
    }

    /// Create a [`Error::RemoteService`] error for a named remote operation.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn route_resolution(path: impl Into<String>) -> Self {
        Self::RouteResolution { path: path.into() }
    }

    pub fn encoding(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            file_name: file_name.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    /// Check if this error was raised by an upload limit check
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(
            self,
            Error::FileCountExceeded { .. }
                | Error::TotalSizeExceeded { .. }
                | Error::FileTooLarge { .. }
        )
    }

    /// Check if this is a local form error that keeps the user on the page
    pub fn is_recoverable(&self) -> bool {
        self.is_limit_exceeded()
            || matches!(
                self,
                Error::Validation { .. }
                    | Error::IncompleteQuestionnaire { .. }
                    | Error::ReadOnlyCase
                    | Error::AttachmentNotFound { .. }
                    | Error::Encoding { .. }
                    | Error::RouteResolution { .. } // Falls back to the default site
            )
    }

    /// Check if this error should send the user to the error page
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::RemoteService { .. } | Error::Io(_) | Error::Json(_)
        )
    }

    /// Message stored in the session error slot before an error redirect
    pub fn session_message(&self) -> String {
        match self {
            Error::RemoteService { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::remote("submitResponses", "SERVICE_DOWN");
        assert_eq!(err.to_string(), "SERVICE_DOWN");

        let err = Error::route_resolution("/site/Other/page");
        assert!(err.to_string().contains("/site/Other/page"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_incomplete_lists_missing_count() {
        let err = Error::incomplete([QuestionId(6), QuestionId(9)]);
        assert!(err.to_string().contains("2 question(s)"));
        match err {
            Error::IncompleteQuestionnaire { missing } => {
                assert_eq!(missing, vec![QuestionId(6), QuestionId(9)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_limit_errors_are_recoverable() {
        let err = Error::FileCountExceeded {
            attempted: 4,
            max: 3,
        };
        assert!(err.is_limit_exceeded());
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());

        let err = Error::TotalSizeExceeded {
            attempted_bytes: 6_000_000,
            max_bytes: 5_242_880,
        };
        assert!(err.is_limit_exceeded());
    }

    #[test]
    fn test_remote_errors_are_fatal() {
        let err = Error::remote("createCase", "timeout");
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_route_resolution_is_recoverable() {
        assert!(Error::route_resolution("/x").is_recoverable());
    }

    #[test]
    fn test_session_message_uses_service_text() {
        let err = Error::remote("fetchDraft", "Insufficient access");
        assert_eq!(err.session_message(), "Insufficient access");

        let err = Error::validation("Description is required");
        assert_eq!(
            err.session_message(),
            "Validation failed: Description is required"
        );
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::validation("test");
        let _ = Error::encoding("a.png", "join failed");
        let _ = Error::config("test");
        let _ = Error::config_invalid("test");
    }
}
