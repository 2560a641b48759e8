//! Output management and formatting.
//!
//! [`OutputManager`] is the terminal side of the core `Reporter` port.
//! Regular output goes to stdout, errors to stderr.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use tracing::debug;

use fastman_core::application::ports::Reporter;

use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    no_color: bool,
    interactive: bool,
    out: Term,
    err: Term,
}

impl OutputManager {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            no_color: config.output.no_color || !console::colors_enabled(),
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.out.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.out.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`, on stderr.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}")
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.err.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{26a0} {msg}")
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.out.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2139} {msg}")
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.out.write_line(&line)
    }

    /// Bold yellow section header.
    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.yellow().bold().to_string()
        };
        self.out.write_line(&line)
    }

    /// Ask a yes/no question; non-interactive runs get `default`.
    pub fn confirm(&self, prompt: &str, default: bool) -> bool {
        if !self.interactive {
            debug!(prompt, default, "not a terminal, using default answer");
            return default;
        }
        self.prompt(prompt, default)
    }

    #[cfg(feature = "interactive")]
    fn prompt(&self, prompt: &str, default: bool) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_opt()
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    #[cfg(not(feature = "interactive"))]
    fn prompt(&self, prompt: &str, default: bool) -> bool {
        let hint = if default { "Y/n" } else { "y/N" };
        let _ = self.out.write_str(&format!("{prompt} [{hint}]: "));
        match self.out.read_line() {
            Ok(answer) => match answer.trim().to_ascii_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            },
            Err(_) => default,
        }
    }
}

/// Write failures (closed pipe, full disk) are logged, never fatal.
fn emit(result: io::Result<()>) {
    if let Err(e) = result {
        debug!(error = %e, "console write failed");
    }
}

impl Reporter for OutputManager {
    fn line(&self, msg: &str) {
        emit(self.print(msg));
    }

    fn header(&self, msg: &str) {
        emit(OutputManager::header(self, msg));
    }

    fn info(&self, msg: &str) {
        emit(OutputManager::info(self, msg));
    }

    fn success(&self, msg: &str) {
        emit(OutputManager::success(self, msg));
    }

    fn warning(&self, msg: &str) {
        emit(OutputManager::warning(self, msg));
    }

    fn error(&self, msg: &str) {
        emit(OutputManager::error(self, msg));
    }

    fn confirm(&self, prompt: &str, default: bool) -> bool {
        OutputManager::confirm(self, prompt, default)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(no_color: bool) -> OutputManager {
        let mut config = AppConfig::default();
        config.output.no_color = no_color;
        OutputManager::new(&config)
    }

    #[test]
    fn writes_do_not_fail_without_tty() {
        let out = make_manager(true);
        assert!(out.print("hello").is_ok());
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn no_color_config_is_honoured() {
        assert!(make_manager(true).no_color);
    }

    #[test]
    fn confirm_without_terminal_returns_default() {
        let out = OutputManager {
            interactive: false,
            ..make_manager(true)
        };
        assert!(out.confirm("Proceed?", true));
        assert!(!out.confirm("Proceed?", false));
    }
}
