//! `generate:key`, `config:cache`, `config:clear`, `cache:clear` and `activate`.

use std::path::{Path, PathBuf};

use fastman_core::application::{Command, CommandDescriptor, CommandEnv};
use fastman_core::domain::{ArgumentVector, DomainError, Toolchain};
use fastman_core::error::{Context as _, FastmanResult};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::boxed;

const ENV_FILE: &str = ".env";
const CONFIG_CACHE: &str = "config_cache.json";
const SECRET_KEY_PREFIX: &str = "SECRET_KEY=";
const VENV_DIRS: [&str; 3] = [".venv", "venv", "env"];
/// Never descended into by `cache:clear`.
const CACHE_SKIP_DIRS: [&str; 4] = [".git", ".venv", "venv", "env"];

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![
        CommandDescriptor::new(
            "generate:key {--show}",
            "Generate a secure secret key",
            boxed(GenerateKey),
        )?,
        CommandDescriptor::new(
            "config:cache",
            "Cache environment configuration",
            boxed(|_| ConfigCache),
        )?,
        CommandDescriptor::new(
            "config:clear",
            "Clear configuration cache",
            boxed(|_| ConfigClear),
        )?,
        CommandDescriptor::new(
            "cache:clear",
            "Clear Python cache files",
            boxed(|_| CacheClear),
        )?,
        CommandDescriptor::new(
            "activate",
            "Show how to activate the virtual environment",
            boxed(|_| Activate),
        )?,
    ])
}

// ── generate:key ──────────────────────────────────────────────────────────

/// 64 hex characters (256 random bits).
pub(crate) fn secret_key() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// `content` with its `SECRET_KEY=` line replaced, or one appended.
fn with_secret_key(content: &str, key: &str) -> String {
    let line = format!("{SECRET_KEY_PREFIX}{key}");
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|l| {
            if !replaced && l.trim_start().starts_with(SECRET_KEY_PREFIX) {
                replaced = true;
                line.clone()
            } else {
                l.to_string()
            }
        })
        .collect();
    if !replaced {
        lines.push(line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

struct GenerateKey(ArgumentVector);

impl Command for GenerateKey {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let key = secret_key();
        let out = env.out();

        if self.0.flag("show") {
            out.line(&format!("Generated key: {key}"));
            return Ok(());
        }

        let path = env.context.path(ENV_FILE);
        if env.fs().exists(&path) {
            let content = env.fs().read_to_string(&path)?;
            env.fs().write_file(&path, &with_secret_key(&content, &key))?;
            out.success("Secret key updated in .env");
        } else {
            env.fs().write_file(&path, &with_secret_key("", &key))?;
            out.success("Secret key created in .env");
        }
        out.line(&format!("Key: {key}"));
        Ok(())
    }
}

// ── config:cache / config:clear ───────────────────────────────────────────

/// `KEY=value` pairs of a dotenv file. Blank lines and `#` comments are
/// skipped; a repeated key keeps its last value.
fn env_variables(content: &str) -> serde_json::Map<String, serde_json::Value> {
    let mut vars = serde_json::Map::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            vars.insert(key.trim().to_string(), value.trim().into());
        }
    }
    vars
}

struct ConfigCache;

impl Command for ConfigCache {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let path = env.context.path(ENV_FILE);
        if !env.fs().exists(&path) {
            return Err(DomainError::Precondition {
                message: ".env file not found".into(),
                hint: Some("Run 'fastman init' or 'fastman generate:key' to create one".into()),
            }
            .into());
        }

        let vars = env_variables(&env.fs().read_to_string(&path)?);
        let count = vars.len();
        let mut json = serde_json::to_string_pretty(&vars).context("serialising configuration")?;
        json.push('\n');
        env.fs().write_file(&env.context.path(CONFIG_CACHE), &json)?;

        env.out()
            .success(&format!("Configuration cached ({count} variables)"));
        Ok(())
    }
}

struct ConfigClear;

impl Command for ConfigClear {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let path = env.context.path(CONFIG_CACHE);
        if env.fs().exists(&path) {
            env.fs().remove_file(&path)?;
            env.out().success("Configuration cache cleared");
        } else {
            env.out().info("No cache to clear");
        }
        Ok(())
    }
}

// ── cache:clear ───────────────────────────────────────────────────────────

/// What `cache:clear` would delete under `root`: `__pycache__` directories
/// and `.pyc` files outside them.
fn cache_targets(env: &CommandEnv<'_>, root: &Path) -> FastmanResult<Vec<PathBuf>> {
    let fs = env.fs();
    let mut targets: Vec<PathBuf> = Vec::new();

    for path in fs.walk(root, &CACHE_SKIP_DIRS)? {
        if targets.iter().any(|t| path.starts_with(t)) {
            continue;
        }

        let is_pycache = path.file_name().is_some_and(|n| n == "__pycache__");
        if is_pycache && fs.is_dir(&path) {
            targets.push(path);
        } else if path.extension().is_some_and(|e| e == "pyc") && !fs.is_dir(&path) {
            targets.push(path);
        }
    }
    Ok(targets)
}

struct CacheClear;

impl Command for CacheClear {
    #[instrument(skip_all, fields(command = "cache:clear"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let fs = env.fs();
        let out = env.out();
        let mut cleared = 0usize;

        for target in cache_targets(env, env.context.project_root())? {
            let result = if fs.is_dir(&target) {
                fs.remove_dir_all(&target)
            } else {
                fs.remove_file(&target)
            };
            match result {
                Ok(()) => cleared += 1,
                Err(e) => {
                    debug!(error = %e, path = %target.display(), "cache entry not removed");
                    out.warning(&format!("Failed to remove {}: {e}", target.display()));
                }
            }
        }

        out.success(&format!("Cleared {cleared} cache files/directories"));
        Ok(())
    }
}

// ── activate ──────────────────────────────────────────────────────────────

/// Activation commands for a virtualenv directory `venv`.
fn activation_lines(venv: &str, windows: bool, shell: Option<&str>) -> Vec<String> {
    if windows {
        return vec![
            format!("CMD:        {venv}\\Scripts\\activate.bat"),
            format!("PowerShell: {venv}\\Scripts\\Activate.ps1"),
        ];
    }

    let shell = shell
        .and_then(|s| Path::new(s).file_name())
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let script = match shell {
        "fish" => "activate.fish",
        "csh" | "tcsh" => "activate.csh",
        _ => "activate",
    };
    vec![format!("source {venv}/bin/{script}")]
}

struct Activate;

impl Command for Activate {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let out = env.out();
        let found = VENV_DIRS
            .into_iter()
            .find(|dir| env.fs().is_dir(&env.context.path(dir)));

        let Some(venv) = found else {
            let shell_hint = match env.context.toolchain() {
                Toolchain::Poetry => Some("poetry shell"),
                Toolchain::Pipenv => Some("pipenv shell"),
                Toolchain::Uv | Toolchain::Pip => None,
            };
            if let Some(command) = shell_hint {
                out.info("The environment is managed outside the project. Run:");
                out.line(&format!("  {command}"));
                return Ok(());
            }
            return Err(DomainError::Precondition {
                message: "No virtual environment found".into(),
                hint: Some(format!("Expected one of: {}", VENV_DIRS.join(", "))),
            }
            .into());
        };

        let shell = std::env::var("SHELL").ok();
        out.info("Run the following command to activate:");
        for line in activation_lines(venv, cfg!(windows), shell.as_deref()) {
            out.line(&format!("  {line}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;

    #[test]
    fn keys_are_64_hex_chars_and_unique() {
        let a = secret_key();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, secret_key());
    }

    #[test]
    fn existing_secret_key_line_is_replaced() {
        let content = "DEBUG=true\nSECRET_KEY=old\nPORT=8000\n";
        assert_eq!(
            with_secret_key(content, "new"),
            "DEBUG=true\nSECRET_KEY=new\nPORT=8000\n"
        );
        assert_eq!(with_secret_key("DEBUG=true", "k"), "DEBUG=true\nSECRET_KEY=k\n");
        assert_eq!(with_secret_key("", "k"), "SECRET_KEY=k\n");
    }

    #[test]
    fn show_only_prints() {
        let h = Harness::new();
        assert_eq!(h.run(&["generate:key", "--show"]).exit_code(), 0);
        assert!(h.reporter.contains("Generated key: "));
        assert!(h.file(".env").is_none());
    }

    #[test]
    fn key_is_written_to_env() {
        let h = Harness::new();
        h.seed(".env", "DEBUG=true\nSECRET_KEY=changeme\n");

        assert_eq!(h.run(&["generate:key"]).exit_code(), 0);
        let env = h.file(".env").unwrap();
        assert!(env.starts_with("DEBUG=true\nSECRET_KEY="));
        assert!(!env.contains("changeme"));
        assert!(h.reporter.contains("Secret key updated in .env"));

        let h = Harness::new();
        assert_eq!(h.run(&["generate:key"]).exit_code(), 0);
        assert!(h.file(".env").unwrap().starts_with("SECRET_KEY="));
        assert!(h.reporter.contains("Secret key created in .env"));
    }

    #[test]
    fn env_lines_become_variables() {
        let vars = env_variables("# app\nDEBUG = true\n\nDATABASE_URL=sqlite:///./a.db?x=1\nnot a pair\nDEBUG=false\n");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars["DEBUG"], "false");
        assert_eq!(vars["DATABASE_URL"], "sqlite:///./a.db?x=1");
    }

    #[test]
    fn config_cache_then_clear() {
        let h = Harness::new();
        h.seed(".env", "PROJECT_NAME=shop\nSECRET_KEY=abc\n");

        assert_eq!(h.run(&["config:cache"]).exit_code(), 0);
        let cached: serde_json::Value =
            serde_json::from_str(&h.file("config_cache.json").unwrap()).unwrap();
        assert_eq!(cached["PROJECT_NAME"], "shop");
        assert_eq!(cached["SECRET_KEY"], "abc");
        assert!(h.reporter.contains("Configuration cached (2 variables)"));

        assert_eq!(h.run(&["config:clear"]).exit_code(), 0);
        assert!(h.file("config_cache.json").is_none());
        assert!(h.reporter.contains("Configuration cache cleared"));

        assert_eq!(h.run(&["config:clear"]).exit_code(), 0);
        assert!(h.reporter.contains("No cache to clear"));
    }

    #[test]
    fn config_cache_needs_an_env_file() {
        let h = Harness::new();
        assert_eq!(h.run(&["config:cache"]).exit_code(), 1);
        assert!(h.reporter.contains(".env file not found"));
        assert!(h.file("config_cache.json").is_none());
    }

    #[test]
    fn cache_clear_removes_pycache_and_stray_pyc() {
        let h = Harness::new();
        h.seed("app/__pycache__/main.cpython-312.pyc", "");
        h.seed("app/core/__pycache__/config.cpython-312.pyc", "");
        h.seed("legacy/old.pyc", "");
        h.seed(".venv/lib/__pycache__/site.pyc", "");
        h.seed("app/main.py", "");

        assert_eq!(h.run(&["cache:clear"]).exit_code(), 0);
        assert!(h.reporter.contains("Cleared 3 cache files/directories"));

        let files = h.fs.list_files();
        assert_eq!(
            files,
            [h.path(".venv/lib/__pycache__/site.pyc"), h.path("app/main.py")]
        );
    }

    #[test]
    fn cache_clear_skips_unreadable_directories() {
        let h = Harness::new();
        h.seed("broken/__pycache__/x.pyc", "");
        h.seed("app/__pycache__/main.cpython-312.pyc", "");
        h.fs.fail_listing(h.path("broken"));

        assert_eq!(h.run(&["cache:clear"]).exit_code(), 0);
        assert!(h.reporter.contains("Cleared 1 cache files/directories"));
        assert!(h.file("app/__pycache__/main.cpython-312.pyc").is_none());
        assert!(h.file("broken/__pycache__/x.pyc").is_some());
    }

    #[test]
    fn activation_depends_on_platform_and_shell() {
        assert_eq!(
            activation_lines(".venv", false, Some("/usr/bin/fish")),
            ["source .venv/bin/activate.fish"]
        );
        assert_eq!(
            activation_lines("venv", false, Some("/bin/tcsh")),
            ["source venv/bin/activate.csh"]
        );
        assert_eq!(activation_lines("env", false, None), ["source env/bin/activate"]);
        assert_eq!(activation_lines(".venv", true, None).len(), 2);
    }

    #[test]
    fn activate_finds_a_venv() {
        let h = Harness::new();
        h.seed_dir("venv/bin");
        assert_eq!(h.run(&["activate"]).exit_code(), 0);
        assert!(h.reporter.contains("venv"));
    }

    #[test]
    fn activate_without_venv() {
        let h = Harness::new();
        assert_eq!(h.run(&["activate"]).exit_code(), 1);
        assert!(h.reporter.contains("No virtual environment found"));
        assert!(h.reporter.contains("Expected one of: .venv, venv, env"));

        let h = Harness::new().with_toolchain(Toolchain::Pipenv);
        assert_eq!(h.run(&["activate"]).exit_code(), 0);
        assert!(h.reporter.contains("pipenv shell"));
    }
}
