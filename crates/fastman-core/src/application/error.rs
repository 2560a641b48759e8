//! Application layer errors.
//!
//! These describe failures while carrying out a command (I/O, child
//! processes, plugin manifests, cancellation), as opposed to the caller
//! input problems in [`crate::domain::DomainError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// A file or directory the command would create is already there.
    #[error("{what} already exists at {path}")]
    AlreadyExists { what: String, path: PathBuf },

    /// A child process could not be started at all.
    #[error("Could not run '{program}': {reason}")]
    ProcessSpawn { program: String, reason: String },

    /// A child process ran and exited unsuccessfully.
    #[error("'{command}' failed{}", exit_suffix(.code))]
    ProcessFailed { command: String, code: Option<i32> },

    /// A plugin manifest could not be read or parsed.
    #[error("Invalid plugin manifest {path}: {reason}")]
    PluginManifest { path: PathBuf, reason: String },

    /// Scaffold rollback could not remove something it created.
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },

    /// The user interrupted the run or declined to continue mid-way.
    #[error("Operation cancelled")]
    Cancelled,
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::AlreadyExists { .. } => {
                vec!["Choose a different name or remove the existing one".into()]
            }
            Self::ProcessSpawn { program, .. } => vec![
                format!("Make sure '{program}' is installed and on your PATH"),
            ],
            Self::ProcessFailed { .. } => {
                vec!["See the command output above for details".into()]
            }
            Self::PluginManifest { .. } => vec![
                "Manifests need `signature`, `description` and `run` keys".into(),
            ],
            Self::RollbackFailed { path, .. } => {
                vec![format!("Remove {} manually before retrying", path.display())]
            }
            Self::Cancelled => Vec::new(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::UserInput,
            Self::ProcessSpawn { .. } => ErrorCategory::NotFound,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Filesystem { .. }
            | Self::ProcessFailed { .. }
            | Self::PluginManifest { .. }
            | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_failure_message_names_the_command() {
        let err = ApplicationError::ProcessFailed {
            command: "alembic upgrade head".into(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "'alembic upgrade head' failed with exit code 2"
        );

        let signalled = ApplicationError::ProcessFailed {
            command: "uv sync".into(),
            code: None,
        };
        assert!(signalled.to_string().ends_with("(terminated by signal)"));
    }

    #[test]
    fn categories() {
        assert_eq!(ApplicationError::Cancelled.category(), ErrorCategory::Cancelled);
        assert_eq!(
            ApplicationError::ProcessSpawn {
                program: "uv".into(),
                reason: "not found".into()
            }
            .category(),
            ErrorCategory::NotFound
        );
    }
}
