//! Application ports (traits) for external dependencies.
//!
//! Commands never touch the disk, spawn processes or write to the terminal
//! directly; they go through these traits. `fastman-adapters` implements the
//! filesystem and process ports, `fastman-cli` implements [`Reporter`].
//!
//! - `Filesystem`: no-clobber file and directory operations
//! - `ProcessRunner`: blocking child processes
//! - `Reporter`: user-facing console output and confirmations

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FastmanError, FastmanResult};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `fastman_adapters::filesystem::LocalFilesystem` (production)
/// - `fastman_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> FastmanResult<()>;

    /// Write content to a file, replacing it if present.
    ///
    /// Callers decide about clobbering; see [`crate::application::ScaffoldService`].
    fn write_file(&self, path: &Path, content: &str) -> FastmanResult<()>;

    fn read_to_string(&self, path: &Path) -> FastmanResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn remove_file(&self, path: &Path) -> FastmanResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> FastmanResult<()>;

    /// Every file and directory below `root`, parents before children.
    ///
    /// Directories whose name is in `prune` are neither listed nor entered.
    /// Entries that cannot be read are logged and left out.
    fn walk(&self, root: &Path, prune: &[&str]) -> FastmanResult<Vec<PathBuf>>;
}

/// One child process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of inheriting the terminal.
    pub capture: bool,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    /// Build from a full argv (`program` first).
    pub fn from_argv<I, S>(argv: I) -> FastmanResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv
            .next()
            .ok_or_else(|| FastmanError::internal("empty command line"))?;
        Ok(Self::new(program).args(argv))
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// `None` when the child was killed by a signal.
    pub code: Option<i32>,
    /// Empty unless capture was requested.
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Port for running external programs (package managers, Alembic, uvicorn).
///
/// A non-zero exit is *not* an error at this level; only failing to start
/// the program is.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    fn run(&self, spec: &ProcessSpec) -> FastmanResult<ProcessOutcome>;
}

/// Port for user-facing console output.
pub trait Reporter: Send + Sync {
    /// Plain line on stdout.
    fn line(&self, msg: &str);

    fn header(&self, msg: &str);

    fn info(&self, msg: &str);

    fn success(&self, msg: &str);

    fn warning(&self, msg: &str);

    /// Always shown, even in quiet mode.
    fn error(&self, msg: &str);

    /// Ask a yes/no question. Non-interactive reporters return `default`.
    fn confirm(&self, prompt: &str, default: bool) -> bool;
}
