//! Per-run invocation context.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::Toolchain;

/// Shared interrupt flag.
///
/// The CLI's Ctrl-C handler sets it; the dispatcher and process helpers
/// read it. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Read-only state for one CLI run.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    project_root: PathBuf,
    toolchain: Toolchain,
    python: String,
    interrupt: Interrupt,
}

impl InvocationContext {
    pub fn new(project_root: impl Into<PathBuf>, toolchain: Toolchain) -> Self {
        Self {
            project_root: project_root.into(),
            toolchain,
            python: default_python().to_string(),
            interrupt: Interrupt::new(),
        }
    }

    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Working directory at start-up.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// `project_root` joined with `relative`.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(relative)
    }

    pub fn toolchain(&self) -> Toolchain {
        self.toolchain
    }

    /// Interpreter used for `python -m ...` invocations.
    pub fn python(&self) -> &str {
        &self.python
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    /// `argv` behind the tool chain's run prefix.
    pub fn wrap(&self, argv: &[&str]) -> Vec<String> {
        self.toolchain.wrap(argv.iter().copied())
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}
