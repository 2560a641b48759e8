//! Start-up errors for the Fastman CLI.
//!
//! Command failures never reach this type: the dispatcher reports those
//! itself and hands back an exit code. `CliError` covers what can go wrong
//! before a command runs (configuration, logging, the built-in catalog).

use std::error::Error;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use fastman_core::error::FastmanError;

use crate::config::{AppConfig, PROJECT_CONFIG_FILE};
use crate::logging::LOG_ENV;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration file or variable could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialise logging: {message}")]
    Logging { message: String },

    /// A core error raised while building the command catalog.
    #[error("Start-up failed: {0}")]
    Core(#[from] FastmanError),

    #[error("Cannot access the working directory: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(err: anyhow::Error) -> Self {
        Self::Config {
            message: format!("{err:#}"),
            source: Some(err.into()),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config { .. } => vec![
                format!("Check the global config at {}", AppConfig::config_path().display()),
                format!("Check {PROJECT_CONFIG_FILE} in the current directory"),
                "Environment overrides look like FASTMAN__PARSER__SEPARATED_OPTIONS=true".into(),
            ],
            Self::Logging { .. } => vec![
                format!("Check the {LOG_ENV} / RUST_LOG filter syntax"),
                "Set logging.file = false to disable the diagnostic log".into(),
            ],
            Self::Core(core) => core.suggestions(),
            Self::Io(_) => vec!["Check that the directory still exists and is readable".into()],
        }
    }

    /// Fastman only ever exits 0, 1 or 130.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Core(core) => core.exit_code(),
            _ => 1,
        }
    }

    /// Underlying causes, outermost first.
    fn causes(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(self.source(), |err| (*err).source())
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: String, style: fn(&str) -> String| {
            if colored { style(&text) } else { text }
        };
        let mut out = String::new();

        let _ = writeln!(out, "\n{}", paint(format!("Error: {self}"), |t| t.red().bold().to_string()));
        if verbose {
            for cause in self.causes() {
                let _ = writeln!(out, "{}", paint(format!("  Caused by: {cause}"), |t| t.dimmed().to_string()));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            let _ = writeln!(out, "\n{}", paint("Suggestions:".into(), |t| t.yellow().bold().to_string()));
            for suggestion in &suggestions {
                let _ = writeln!(out, "  {suggestion}");
            }
        }

        if !verbose {
            let hint = format!("Set {LOG_ENV}=debug for more details.");
            let _ = writeln!(out, "\n{}", paint(hint, |t| t.dimmed().to_string()));
        }
        out
    }

    pub fn log(&self) {
        let causes: Vec<String> = self.causes().map(ToString::to_string).collect();
        match self {
            Self::Core(core) if core.exit_code() == 130 => {
                tracing::info!(error = %self, "start-up cancelled");
            }
            _ => tracing::error!(error = %self, ?causes, "start-up failed"),
        }
    }
}
