//! Python tool-chain model.
//!
//! Detection itself touches the filesystem and `PATH`, so it lives in
//! `fastman-adapters`; this module holds the pure decision table and the
//! argv each tool chain expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Which Python package manager drives the project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolchain {
    Uv,
    Poetry,
    Pipenv,
    #[default]
    Pip,
}

/// Facts about the working directory that decide the tool chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolchainMarkers {
    pub uv_lock: bool,
    pub poetry_lock: bool,
    pub pipfile: bool,
    pub pyproject: bool,
    pub uv_on_path: bool,
}

impl Toolchain {
    pub const ALL: [Toolchain; 4] = [Self::Uv, Self::Poetry, Self::Pipenv, Self::Pip];

    /// Decide from marker files.
    ///
    /// Priority: `uv.lock` > `poetry.lock` > `Pipfile` > (`pyproject.toml`
    /// and `uv` installed) > pip. A bare `uv` binary is not enough on its own:
    /// another lock file always wins.
    pub fn from_markers(markers: ToolchainMarkers) -> Self {
        if markers.uv_lock {
            Self::Uv
        } else if markers.poetry_lock {
            Self::Poetry
        } else if markers.pipfile {
            Self::Pipenv
        } else if markers.pyproject && markers.uv_on_path {
            Self::Uv
        } else {
            Self::Pip
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uv => "uv",
            Self::Poetry => "poetry",
            Self::Pipenv => "pipenv",
            Self::Pip => "pip",
        }
    }

    /// Prefix used to run a script inside the project environment.
    ///
    /// Empty for pip: the script is called directly.
    pub fn run_prefix(self) -> &'static [&'static str] {
        match self {
            Self::Uv => &["uv", "run"],
            Self::Poetry => &["poetry", "run"],
            Self::Pipenv => &["pipenv", "run"],
            Self::Pip => &[],
        }
    }

    /// `program args...` with the run prefix applied.
    pub fn wrap<I, S>(self, argv: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_prefix()
            .iter()
            .map(|s| (*s).to_string())
            .chain(argv.into_iter().map(Into::into))
            .collect()
    }

    /// argv that adds packages to the project.
    pub fn install_argv(self, python: &str, packages: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = match self {
            Self::Uv => vec!["uv".into(), "add".into()],
            Self::Poetry => vec!["poetry".into(), "add".into()],
            Self::Pipenv => vec!["pipenv".into(), "install".into()],
            Self::Pip => vec![python.into(), "-m".into(), "pip".into(), "install".into()],
        };
        argv.extend(packages.iter().cloned());
        argv
    }

    /// argv that removes packages from the project.
    pub fn remove_argv(self, python: &str, packages: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = match self {
            Self::Uv => vec!["uv".into(), "remove".into()],
            Self::Poetry => vec!["poetry".into(), "remove".into()],
            Self::Pipenv => vec!["pipenv".into(), "uninstall".into()],
            Self::Pip => vec![
                python.into(),
                "-m".into(),
                "pip".into(),
                "uninstall".into(),
                "-y".into(),
            ],
        };
        argv.extend(packages.iter().cloned());
        argv
    }

    /// argv that lists installed packages.
    pub fn list_argv(self, python: &str) -> Vec<String> {
        match self {
            Self::Uv => vec!["uv".into(), "pip".into(), "list".into()],
            Self::Poetry => vec!["poetry".into(), "show".into()],
            Self::Pipenv => vec!["pipenv".into(), "graph".into()],
            Self::Pip => vec![python.into(), "-m".into(), "pip".into(), "list".into()],
        }
    }

    /// argv that installs the dependencies already declared by the project.
    pub fn sync_argv(self, python: &str) -> Vec<String> {
        match self {
            Self::Uv => vec!["uv".into(), "sync".into()],
            Self::Poetry => vec!["poetry".into(), "install".into()],
            Self::Pipenv => vec!["pipenv".into(), "install".into()],
            Self::Pip => vec![
                python.into(),
                "-m".into(),
                "pip".into(),
                "install".into(),
                "-r".into(),
                "requirements.txt".into(),
            ],
        }
    }

    /// Whether installs must also be mirrored into `requirements.txt`.
    pub fn tracks_requirements_file(self) -> bool {
        self == Self::Pip
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toolchain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| DomainError::InvalidOption {
                option: "package".into(),
                value: s.to_string(),
                reason: "Must be one of: uv, poetry, pipenv, pip".into(),
            })
    }
}
