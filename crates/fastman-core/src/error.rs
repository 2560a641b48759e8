//! Unified error handling for Fastman Core.
//!
//! [`FastmanError`] wraps domain and application errors and decides how the
//! dispatcher reports them and which exit code the process ends with.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Fastman Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FastmanError {
    /// Caller input problems (arguments, names, project state).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Failures while carrying out a command.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FastmanError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec!["This appears to be a bug in Fastman".into()],
        }
    }

    /// How the dispatcher treats this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::UserInput,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    pub fn is_cancelled(&self) -> bool {
        self.category() == ErrorCategory::Cancelled
    }
}

/// Error categories, used for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Shown as a plain one-line message.
    UserInput,
    /// "Operation cancelled", exit 130.
    Cancelled,
    /// A program or file the command depends on is missing.
    NotFound,
    /// Reported as an unexpected failure and logged in full.
    Internal,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Cancelled => 130,
            Self::UserInput | Self::NotFound | Self::Internal => 1,
        }
    }
}

/// Convenient result type alias.
pub type FastmanResult<T> = Result<T, FastmanError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> FastmanResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> FastmanResult<T> {
        self.map_err(|e| FastmanError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_category() {
        let input: FastmanError = DomainError::MissingArgument {
            label: "Feature name".into(),
        }
        .into();
        assert_eq!(input.category(), ErrorCategory::UserInput);
        assert_eq!(input.exit_code(), 1);

        let cancelled: FastmanError = ApplicationError::Cancelled.into();
        assert!(cancelled.is_cancelled());
        assert_eq!(cancelled.exit_code(), 130);

        assert_eq!(FastmanError::internal("boom").exit_code(), 1);
    }

    #[test]
    fn transparent_display() {
        let err: FastmanError = DomainError::MissingArgument {
            label: "Feature name".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Feature name is required");
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk full"));
        let err = res.context("writing .env").unwrap_err();
        assert_eq!(err.to_string(), "Internal error: writing .env: disk full");
    }
}
