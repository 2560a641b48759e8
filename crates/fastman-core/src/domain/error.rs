// ============================================================================
// domain/error.rs - caller-input errors
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Every variant describes something the *caller* got wrong: a missing
/// argument, a name that breaks identifier rules, an option value that does
/// not parse. The dispatcher turns all of them into exit code 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Argument errors
    // ========================================================================
    #[error("{label} is required")]
    MissingArgument { label: String },

    #[error("Invalid value '{value}' for --{option}: {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    // ========================================================================
    // Naming errors
    // ========================================================================
    #[error("Invalid name '{name}'. {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Name cannot be empty")]
    EmptyName,

    // ========================================================================
    // Signature / registration errors
    // ========================================================================
    #[error("Invalid command signature '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },

    // ========================================================================
    // Project-state errors
    // ========================================================================
    /// The project is not in a state the command can work with
    /// (e.g. `make:feature` outside a feature-pattern project).
    #[error("{message}")]
    Precondition { message: String, hint: Option<String> },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingArgument { .. } => {
                vec!["Run 'fastman list' to see each command's signature".into()]
            }
            Self::InvalidOption { option, .. } => {
                vec![format!("Pass the option as --{option}=<value>")]
            }
            Self::InvalidName { .. } | Self::EmptyName => vec![
                "Start with a letter; use only letters, numbers and underscores".into(),
                "Examples: user_profile, Order, invoice2".into(),
            ],
            Self::InvalidSignature { .. } => vec![
                "Signatures look like: make:thing {name} {--option=default} {--flag}".into(),
            ],
            Self::Precondition { hint, .. } => hint.iter().cloned().collect(),
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSignature { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
