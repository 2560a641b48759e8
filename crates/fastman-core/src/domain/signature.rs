//! Command signatures.
//!
//! A signature is the one-line declaration a command registers under:
//!
//! ```text
//! new {name} {--minimal} {--pattern=feature} {--database=sqlite}
//! ```
//!
//! The first token is the command name. `{name}` declares a positional,
//! `{--opt=default}` a value-taking option (the default may be empty) and
//! `{--flag}` a bare flag. Signatures drive help text and tell the argument
//! parser which options may take a separated value; they are never used to
//! reject input.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// One declared parameter of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Parameter {
    Positional { name: String },
    Option { name: String, default: Option<String> },
    Flag { name: String },
}

impl Parameter {
    pub fn name(&self) -> &str {
        match self {
            Self::Positional { name } | Self::Option { name, .. } | Self::Flag { name } => name,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional { name } => write!(f, "<{name}>"),
            Self::Option {
                name,
                default: Some(default),
            } => write!(f, "[--{name}={default}]"),
            Self::Option { name, default: None } => write!(f, "[--{name}=<value>]"),
            Self::Flag { name } => write!(f, "[--{name}]"),
        }
    }
}

/// A parsed command signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    raw: String,
    name: Option<String>,
    parameters: Vec<Parameter>,
}

impl Signature {
    /// Parse a signature string.
    ///
    /// An empty (or all-whitespace) signature is valid and has no name; the
    /// registry then falls back to the descriptor's explicit name.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let mut tokens = raw.split_whitespace();

        let name = match tokens.next() {
            None => None,
            Some(first) if first.starts_with('{') => {
                return Err(DomainError::InvalidSignature {
                    signature: raw.clone(),
                    reason: "the first token must be the command name".into(),
                });
            }
            Some(first) => Some(first.to_string()),
        };

        let mut parameters = Vec::new();
        for token in tokens {
            parameters.push(parse_parameter(&raw, token)?);
        }

        Ok(Self {
            raw,
            name,
            parameters,
        })
    }

    /// Command name declared by the signature, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Names of options declared as value-taking (`{--name=...}`).
    pub fn value_options(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(|p| match p {
            Parameter::Option { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Declared default of a value-taking option.
    pub fn default_for(&self, option: &str) -> Option<&str> {
        self.parameters.iter().find_map(|p| match p {
            Parameter::Option { name, default } if name == option => default.as_deref(),
            _ => None,
        })
    }

    /// Human-readable usage line, e.g. `make:feature <name> [--crud]`.
    pub fn usage(&self) -> String {
        let mut parts: Vec<String> = self.name.iter().cloned().collect();
        parts.extend(self.parameters.iter().map(ToString::to_string));
        parts.join(" ")
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_parameter(raw: &str, token: &str) -> Result<Parameter, DomainError> {
    let invalid = |reason: &str| DomainError::InvalidSignature {
        signature: raw.to_string(),
        reason: format!("{reason}: '{token}'"),
    };

    let inner = token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| invalid("parameters must be wrapped in braces"))?;

    if let Some(option) = inner.strip_prefix("--") {
        return match option.split_once('=') {
            Some(("", _)) => Err(invalid("option name is empty")),
            Some((name, default)) => Ok(Parameter::Option {
                name: name.to_string(),
                default: (!default.is_empty()).then(|| default.to_string()),
            }),
            None if option.is_empty() => Err(invalid("flag name is empty")),
            None => Ok(Parameter::Flag {
                name: option.to_string(),
            }),
        };
    }

    if inner.is_empty() || inner.starts_with('-') {
        return Err(invalid("positional name is empty or malformed"));
    }

    Ok(Parameter::Positional {
        name: inner.to_string(),
    })
}
