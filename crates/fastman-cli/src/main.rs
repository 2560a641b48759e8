//! # Fastman CLI
//!
//! Command dispatcher for FastAPI projects.
//!
//! ## Startup sequence
//!
//! 1. Load `.env`, then configuration (defaults, global file, project file,
//!    environment).
//! 2. Initialise the tracing subscriber (stderr + diagnostic file).
//! 3. Install the Ctrl-C handler and detect the project's tool chain.
//! 4. Register built-in commands, then project plugins.
//! 5. Dispatch the argument vector and exit with the dispatcher's code.
//!
//! Start-up failures are [`CliError`]s, rendered by [`handle_error`].
//! Command failures are reported by the dispatcher itself.
//!
//! ## Exit codes
//!
//! | Code | Meaning                              |
//! |------|--------------------------------------|
//! |  0   | Success                              |
//! |  1   | Unknown command, bad input, failure  |
//! | 130  | Cancelled (Ctrl-C or declined)       |

use std::io::IsTerminal as _;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, info, instrument, warn};

use fastman_adapters::{LocalFilesystem, SystemProcessRunner, detect_toolchain, find_python};
use fastman_core::application::{
    CommandRegistry, Dispatcher, Interrupt, InvocationContext, Runtime,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod commands;
mod config;
mod error;
mod logging;
mod output;
mod templates;

fn main() -> ExitCode {
    // Missing .env is fine: real deployments set real variables.
    let _ = dotenvy::dotenv();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => return handle_error(e.into()),
    };

    // ── 1. Configuration ──────────────────────────────────────────────────
    let config = match AppConfig::load(&cwd) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(CliError::config(e)),
    };

    // ── 2. Tracing ────────────────────────────────────────────────────────
    // The guard flushes the file writer on drop; it must outlive dispatch.
    let _log_guard = match init_logging(&config) {
        Ok(guard) => guard,
        Err(e) => {
            return handle_error(CliError::Logging {
                message: format!("{e:#}"),
            });
        }
    };

    let argv: Vec<String> = std::env::args().skip(1).collect();
    debug!(?argv, cwd = %cwd.display(), "Fastman started");

    match run(&cwd, config, &argv) {
        Ok(code) => {
            info!(code, "Fastman finished");
            ExitCode::from(code)
        }
        Err(e) => handle_error(e),
    }
}

/// Build the registry and runtime, then dispatch `argv`.
#[instrument(skip_all)]
fn run(cwd: &Path, config: AppConfig, argv: &[String]) -> CliResult<u8> {
    // ── 3. Interrupts and tool chain ──────────────────────────────────────
    let interrupt = Interrupt::new();
    let handle = interrupt.clone();
    if let Err(e) = ctrlc::set_handler(move || handle.trigger()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    let mut context = InvocationContext::new(cwd, detect_toolchain(cwd)).with_interrupt(interrupt);
    if let Some(python) = find_python() {
        context = context.with_python(python);
    }

    // ── 4. Registry ───────────────────────────────────────────────────────
    let mut registry = CommandRegistry::new();
    commands::register_builtin(&mut registry).map_err(|e| CliError::Core(e.into()))?;
    if config.plugins.enabled {
        commands::register_plugins(&mut registry, cwd, config.plugins.dirs.as_slice());
    }

    // ── 5. Dispatch ───────────────────────────────────────────────────────
    let runtime = Runtime::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SystemProcessRunner::new()),
        Box::new(OutputManager::new(&config)),
    );
    let outcome = Dispatcher::new(&registry, &context, &runtime)
        .with_option_style(config.option_style())
        .dispatch(argv);

    Ok(outcome.exit_code())
}

/// Render a start-up failure and pick its exit code.
fn handle_error(err: CliError) -> ExitCode {
    err.log();

    let verbose = std::env::var(logging::LOG_ENV)
        .is_ok_and(|level| matches!(level.trim(), "debug" | "trace"));
    let msg = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
