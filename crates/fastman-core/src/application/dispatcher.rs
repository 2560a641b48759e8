//! Argument vector → command → exit code.
//!
//! The dispatcher is the only place that turns a command's result into
//! process behaviour:
//!
//! | Result                         | Reported as                          | Exit |
//! |--------------------------------|--------------------------------------|------|
//! | success                        | (command output only)                | 0    |
//! | unknown command                | `Unknown command: X` + listing hint  | 1    |
//! | user input / not found         | the error message                    | 1    |
//! | cancelled or Ctrl-C            | `Operation cancelled`                | 130  |
//! | anything else                  | `An unexpected error occurred: ...`  | 1    |

use tracing::{debug, error, instrument};

use super::command::{CommandEnv, Runtime};
use super::context::InvocationContext;
use super::registry::CommandRegistry;
use crate::domain::{ArgumentVector, OptionStyle};
use crate::error::{ErrorCategory, FastmanError};

/// Command run for an empty vector or `-h`/`--help`.
pub const LIST_COMMAND: &str = "list";
/// Command run for `-v`/`--version`.
pub const VERSION_COMMAND: &str = "version";

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    UnknownCommand(String),
    Failed(FastmanError),
    Cancelled,
}

impl DispatchOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::UnknownCommand(_) => 1,
            Self::Failed(e) => e.exit_code(),
            Self::Cancelled => 130,
        }
    }
}

pub struct Dispatcher<'a> {
    registry: &'a CommandRegistry,
    context: &'a InvocationContext,
    runtime: &'a Runtime,
    option_style: OptionStyle,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        context: &'a InvocationContext,
        runtime: &'a Runtime,
    ) -> Self {
        Self {
            registry,
            context,
            runtime,
            option_style: OptionStyle::default(),
        }
    }

    pub fn with_option_style(mut self, style: OptionStyle) -> Self {
        self.option_style = style;
        self
    }

    /// Dispatch `argv` (program name already stripped).
    #[instrument(skip_all, fields(command = argv.first().map(String::as_str).unwrap_or("")))]
    pub fn dispatch(&self, argv: &[String]) -> DispatchOutcome {
        let (name, rest): (&str, &[String]) = match argv.split_first() {
            None => (LIST_COMMAND, &[]),
            Some((first, _)) if first == "-h" || first == "--help" => (LIST_COMMAND, &[]),
            Some((first, _)) if first == "-v" || first == "--version" => (VERSION_COMMAND, &[]),
            Some((first, rest)) => (first.as_str(), rest),
        };

        let reporter = self.runtime.reporter.as_ref();

        let Some(descriptor) = self.registry.lookup(name) else {
            debug!(command = name, "unknown command");
            reporter.error(&format!("Unknown command: {name}"));
            reporter.info("Run 'fastman list' to see available commands");
            return DispatchOutcome::UnknownCommand(name.to_string());
        };

        let args = ArgumentVector::parse(rest.iter().cloned(), &descriptor.parse_rules(self.option_style));
        debug!(command = name, args = ?args.raw(), "dispatching");

        let command = descriptor.instantiate(args);
        let env = CommandEnv::new(self.context, self.registry, self.runtime);
        let result = command.execute(&env);

        if self.context.interrupt().is_set() {
            reporter.info("Operation cancelled");
            return DispatchOutcome::Cancelled;
        }

        match result {
            Ok(()) => DispatchOutcome::Completed,
            Err(err) => self.report(err),
        }
    }

    fn report(&self, err: FastmanError) -> DispatchOutcome {
        let reporter = self.runtime.reporter.as_ref();

        match err.category() {
            ErrorCategory::Cancelled => {
                reporter.info("Operation cancelled");
                return DispatchOutcome::Cancelled;
            }
            ErrorCategory::UserInput | ErrorCategory::NotFound => {
                debug!(error = %err, "command rejected input");
                reporter.error(&err.to_string());
                for hint in err.suggestions() {
                    reporter.info(&hint);
                }
            }
            ErrorCategory::Internal => {
                error!(error = ?err, "command failed unexpectedly");
                reporter.error(&format!("An unexpected error occurred: {err}"));
            }
        }

        DispatchOutcome::Failed(err)
    }
}
