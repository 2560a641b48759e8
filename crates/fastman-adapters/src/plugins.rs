//! Project-local plugin discovery.
//!
//! A plugin is a TOML manifest next to the project's code:
//!
//! ```toml
//! signature = "report:daily {--date=}"
//! description = "Send the daily report"
//! run = ["python", "app/console/commands/report_daily.py"]
//! use_run_prefix = true
//! ```
//!
//! Files starting with `_` and anything that is not `.toml` are ignored. A
//! manifest that cannot be read or parsed is logged and skipped; discovery
//! never fails as a whole.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default plugin directory, relative to the project root.
pub const DEFAULT_PLUGIN_DIR: &str = "app/console/commands";

/// Errors while loading a single manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("`run` must name a program")]
    EmptyRun,

    #[error("`signature` must start with the command name")]
    MissingName,
}

fn default_true() -> bool {
    true
}

/// A parsed plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    pub signature: String,
    #[serde(default)]
    pub description: String,
    /// Program and leading arguments; the command's own tokens are appended.
    pub run: Vec<String>,
    /// Run through the tool chain prefix (`uv run`, `poetry run`, ...).
    #[serde(default = "default_true")]
    pub use_run_prefix: bool,
    #[serde(skip)]
    pub source: PathBuf,
}

impl PluginManifest {
    pub fn parse(content: &str, source: &Path) -> Result<Self, ManifestError> {
        let mut manifest: Self = toml::from_str(content)?;
        if manifest.run.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(ManifestError::EmptyRun);
        }
        let first = manifest.signature.split_whitespace().next();
        if first.is_none_or(|t| t.starts_with('{')) {
            return Err(ManifestError::MissingName);
        }
        manifest.source = source.to_path_buf();
        Ok(manifest)
    }

    /// Name declared by the signature.
    pub fn name(&self) -> &str {
        self.signature.split_whitespace().next().unwrap_or_default()
    }
}

/// Scans plugin directories for manifests.
#[derive(Debug, Clone)]
pub struct PluginLoader {
    search_dirs: Vec<PathBuf>,
}

impl PluginLoader {
    /// Loader over `dirs`, each resolved against `root` when relative.
    pub fn new<I, P>(root: &Path, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            search_dirs: dirs.into_iter().map(|d| root.join(d)).collect(),
        }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Load every valid manifest, in directory order then file name order.
    pub fn load_all(&self) -> Vec<PluginManifest> {
        let mut manifests = Vec::new();

        for dir in &self.search_dirs {
            match self.load_from_directory(dir) {
                Ok(found) => manifests.extend(found),
                Err(ManifestError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!("Plugin directory {:?} does not exist, skipping", dir);
                }
                Err(e) => {
                    warn!("Error loading plugins from {:?}: {}", dir, e);
                }
            }
        }

        manifests
    }

    /// Load manifests from one directory.
    pub fn load_from_directory(&self, dir: &Path) -> Result<Vec<PluginManifest>, ManifestError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_manifest(path))
            .collect();
        paths.sort();

        let mut manifests = Vec::new();
        for path in paths {
            match load_from_file(&path) {
                Ok(manifest) => {
                    debug!("Loaded plugin '{}' from {:?}", manifest.name(), path);
                    manifests.push(manifest);
                }
                Err(e) => {
                    warn!("Failed to load plugin from {:?}: {}", path, e);
                }
            }
        }

        Ok(manifests)
    }
}

fn load_from_file(path: &Path) -> Result<PluginManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    PluginManifest::parse(&content, path)
}

fn is_manifest(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with('_'));
    path.is_file() && !hidden && path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAILY: &str = r#"
signature = "report:daily {--date=}"
description = "Send the daily report"
run = ["python", "app/console/commands/report_daily.py"]
"#;

    #[test]
    fn parses_manifest_with_defaults() {
        let m = PluginManifest::parse(DAILY, Path::new("daily.toml")).unwrap();
        assert_eq!(m.name(), "report:daily");
        assert!(m.use_run_prefix);
        assert_eq!(m.run[0], "python");
        assert_eq!(m.source, Path::new("daily.toml"));
    }

    #[test]
    fn rejects_empty_run_and_nameless_signature() {
        let empty_run = "signature = \"x\"\nrun = []";
        assert!(matches!(
            PluginManifest::parse(empty_run, Path::new("x.toml")),
            Err(ManifestError::EmptyRun)
        ));

        let nameless = "signature = \"{name}\"\nrun = [\"python\"]";
        assert!(matches!(
            PluginManifest::parse(nameless, Path::new("x.toml")),
            Err(ManifestError::MissingName)
        ));
    }

    #[test]
    fn skips_broken_hidden_and_foreign_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(DEFAULT_PLUGIN_DIR);
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(dir.join("daily.toml"), DAILY).unwrap();
        std::fs::write(dir.join("broken.toml"), "signature = [").unwrap();
        std::fs::write(dir.join("_draft.toml"), DAILY).unwrap();
        std::fs::write(dir.join("helper.py"), "print('hi')").unwrap();
        std::fs::write(
            dir.join("weekly.toml"),
            "signature = \"report:weekly\"\nrun = [\"python\", \"weekly.py\"]\nuse_run_prefix = false",
        )
        .unwrap();

        let loader = PluginLoader::new(root.path(), [DEFAULT_PLUGIN_DIR]);
        let names: Vec<String> = loader
            .load_all()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names, ["report:daily", "report:weekly"]);
    }

    #[test]
    fn missing_directory_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let loader = PluginLoader::new(root.path(), ["nope"]);
        assert!(loader.load_all().is_empty());
    }
}
