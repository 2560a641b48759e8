//! Tracing subscriber initialisation.
//!
//! Only the CLI crate is allowed to call [`init_logging`]; `fastman-core`
//! and `fastman-adapters` only *emit* spans and events.
//!
//! Two layers are installed:
//!
//! | Layer  | Filter                                         | Target                     |
//! |--------|------------------------------------------------|----------------------------|
//! | stderr | `FASTMAN_LOG`, else `RUST_LOG`, else `warn`    | terminal                   |
//! | file   | `debug` for the fastman crates                 | `<log dir>/fastman.log.*`  |
//!
//! The file rolls daily and holds the full detail of unexpected failures
//! that the console only summarises.

use std::io::IsTerminal as _;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Environment variable holding the console filter.
pub const LOG_ENV: &str = "FASTMAN_LOG";

const DEFAULT_LEVEL: &str = "warn";
const FILE_DIRECTIVE: &str = "fastman=debug,fastman_core=debug,fastman_adapters=debug";
const LOG_FILE_PREFIX: &str = "fastman.log";

/// Initialise the global tracing subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// until the process exits.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let directive = stderr_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let stderr_filter = EnvFilter::try_new(&directive)
        .map_err(|e| anyhow::anyhow!("invalid log filter '{directive}': {e}"))?;

    let use_ansi = !config.output.no_color && std::io::stderr().is_terminal();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let (file_layer, guard) = match file_target(config) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_DIRECTIVE));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // `try_init` returns an error instead of panicking if a subscriber is
    // already set.
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(guard)
}

/// Console filter: `FASTMAN_LOG` wins over `RUST_LOG`; blanks are ignored.
fn stderr_directive(fastman_log: Option<String>, rust_log: Option<String>) -> String {
    [fastman_log, rust_log]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Directory for the diagnostic file, created on demand. `None` disables
/// the file layer.
fn file_target(config: &AppConfig) -> Option<std::path::PathBuf> {
    if !config.logging.file {
        return None;
    }
    let dir = config.log_directory()?;
    ensure_dir(&dir).then_some(dir)
}

fn ensure_dir(dir: &Path) -> bool {
    // Logging is not up yet; a directory we cannot create just means no file.
    std::fs::create_dir_all(dir).is_ok()
}
