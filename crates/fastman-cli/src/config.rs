//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables: `FASTMAN__<SECTION>__<KEY>` (after `.env`)
//! 2. Project file: `./fastman.toml`
//! 3. Global file: `<config dir>/fastman/config.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use fastman_adapters::plugins::DEFAULT_PLUGIN_DIR;
use fastman_core::domain::OptionStyle;

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "fastman.toml";

const ENV_PREFIX: &str = "FASTMAN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub parser: ParserConfig,
    pub plugins: PluginConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `--name value` for options a command declares as value-taking.
    pub separated_options: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub enabled: bool,
    /// Manifest directories, relative to the working directory.
    pub dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write the diagnostic log file.
    pub file: bool,
    /// Override for the log directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dirs: vec![DEFAULT_PLUGIN_DIR.to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: true,
            directory: None,
        }
    }
}

impl AppConfig {
    /// Load configuration for a run started in `project_root`.
    pub fn load(project_root: &Path) -> anyhow::Result<Self> {
        Self::load_from(Some(&Self::config_path()), project_root)
    }

    /// Load with an explicit global file (or none at all).
    pub fn load_from(global: Option<&Path>, project_root: &Path) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("could not serialise default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(global) = global {
            builder = builder.add_source(config::File::from(global).required(false));
        }
        builder = builder
            .add_source(config::File::from(project_root.join(PROJECT_CONFIG_FILE)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("plugins.dirs"),
            );

        builder
            .build()
            .context("could not read configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.fastman.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "fastman", "fastman")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".fastman.toml"))
    }

    /// Directory for the diagnostic log.
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.logging.directory.clone().or_else(|| {
            directories::ProjectDirs::from("dev", "fastman", "fastman")
                .map(|d| d.data_local_dir().join("logs"))
        })
    }

    pub fn option_style(&self) -> OptionStyle {
        if self.parser.separated_options {
            OptionStyle::Separated
        } else {
            OptionStyle::Strict
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert!(!cfg.parser.separated_options);
        assert!(cfg.plugins.enabled);
        assert_eq!(cfg.plugins.dirs, [DEFAULT_PLUGIN_DIR]);
        assert!(cfg.logging.file);
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.option_style(), OptionStyle::Strict);
    }

    #[test]
    fn load_without_files_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(None, dir.path()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn project_file_overrides_global_file() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        std::fs::write(&global, "[parser]\nseparated_options = true\n[output]\nno_color = true\n")
            .unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[output]\nno_color = false\n[plugins]\ndirs = [\"tools/commands\"]\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(&global), dir.path()).unwrap();
        assert_eq!(cfg.option_style(), OptionStyle::Separated);
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.plugins.dirs, ["tools/commands"]);
        assert!(cfg.plugins.enabled);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[parser]\nseparated_options = \"often\"\n")
            .unwrap();
        assert!(AppConfig::load_from(None, dir.path()).is_err());
    }

    #[test]
    fn explicit_log_directory_wins() {
        let mut cfg = AppConfig::default();
        cfg.logging.directory = Some(PathBuf::from("/var/log/fastman"));
        assert_eq!(cfg.log_directory(), Some(PathBuf::from("/var/log/fastman")));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
