//! Argument vector classification.
//!
//! Every token after the command name becomes exactly one of:
//!
//! | Token                    | Class                          |
//! |--------------------------|--------------------------------|
//! | `--name=value`           | option (`=` form)              |
//! | `--name value`           | option (separated form)*       |
//! | `--name`                 | flag                           |
//! | anything else            | positional                     |
//!
//! *Only when [`OptionStyle::Separated`] is active **and** `name` is declared
//! value-taking by the command's signature. The value token must not start
//! with `-`. Without a declaration the pair is a flag followed by a
//! positional, so classification never depends on guessing.
//!
//! Tokens are opaque: no unescaping, no type coercion.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{error::DomainError, signature::Signature};

/// Which option spellings the parser accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionStyle {
    /// Only `--name=value`.
    #[default]
    Strict,
    /// `--name=value`, plus `--name value` for declared value options.
    Separated,
}

/// Per-command parsing rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseRules {
    style: OptionStyle,
    value_options: BTreeSet<String>,
}

impl ParseRules {
    /// `--name=value` only.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Accept `--name value` for the listed option names.
    pub fn separated<I, S>(value_options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            style: OptionStyle::Separated,
            value_options: value_options.into_iter().map(Into::into).collect(),
        }
    }

    /// Rules derived from a signature's declared value options.
    pub fn for_signature(signature: &Signature, style: OptionStyle) -> Self {
        match style {
            OptionStyle::Strict => Self::strict(),
            OptionStyle::Separated => Self::separated(signature.value_options()),
        }
    }

    pub fn style(&self) -> OptionStyle {
        self.style
    }

    fn takes_separated_value(&self, name: &str) -> bool {
        self.style == OptionStyle::Separated && self.value_options.contains(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionForm {
    Equals,
    Separated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Positional(String),
    Option {
        name: String,
        value: String,
        form: OptionForm,
    },
    Flag(String),
}

/// Classified argument tokens for one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentVector {
    raw: Vec<String>,
    tokens: Vec<Token>,
}

impl ArgumentVector {
    /// Classify `raw` under `rules`.
    pub fn parse<I, S>(raw: I, rules: &ParseRules) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw: Vec<String> = raw.into_iter().map(Into::into).collect();
        let mut tokens = Vec::with_capacity(raw.len());

        let mut i = 0;
        while i < raw.len() {
            let token = &raw[i];
            match token.strip_prefix("--") {
                Some(body) => {
                    if let Some((name, value)) = body.split_once('=') {
                        tokens.push(Token::Option {
                            name: name.to_string(),
                            value: value.to_string(),
                            form: OptionForm::Equals,
                        });
                    } else if rules.takes_separated_value(body)
                        && raw.get(i + 1).is_some_and(|next| !next.starts_with('-'))
                    {
                        tokens.push(Token::Option {
                            name: body.to_string(),
                            value: raw[i + 1].clone(),
                            form: OptionForm::Separated,
                        });
                        i += 1;
                    } else {
                        tokens.push(Token::Flag(body.to_string()));
                    }
                }
                None => tokens.push(Token::Positional(token.clone())),
            }
            i += 1;
        }

        Self { raw, tokens }
    }

    /// Classify under strict rules.
    pub fn strict<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::parse(raw, &ParseRules::strict())
    }

    /// The `index`-th positional, counting only positionals.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals().nth(index)
    }

    pub fn positional_or<'a>(&'a self, index: usize, default: &'a str) -> &'a str {
        self.positional(index).unwrap_or(default)
    }

    /// Positional that the command cannot run without.
    pub fn require_positional(&self, index: usize, label: &str) -> Result<&str, DomainError> {
        self.positional(index)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DomainError::MissingArgument {
                label: label.to_string(),
            })
    }

    pub fn positionals(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(|t| match t {
            Token::Positional(v) => Some(v.as_str()),
            _ => None,
        })
    }

    /// Value of `--name`.
    ///
    /// `--name=value` tokens are searched first, then separated pairs; the
    /// leftmost hit of each form wins.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.find_option(name, OptionForm::Equals)
            .or_else(|| self.find_option(name, OptionForm::Separated))
    }

    pub fn option_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.option(name).unwrap_or(default)
    }

    /// Parse an option into `T`, falling back to `default` when absent.
    ///
    /// A present but unparsable value is a validation error, never silently
    /// replaced by the default.
    pub fn parse_option<T>(&self, name: &str, default: T) -> Result<T, DomainError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.option(name) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|e: T::Err| DomainError::InvalidOption {
                option: name.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// `true` iff a bare `--name` token is present.
    pub fn flag(&self, name: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Flag(f) if f == name))
    }

    /// The tokens exactly as received.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn find_option(&self, name: &str, form: OptionForm) -> Option<&str> {
        self.tokens.iter().find_map(|t| match t {
            Token::Option {
                name: n,
                value,
                form: f,
            } if n == name && *f == form => Some(value.as_str()),
            _ => None,
        })
    }
}
