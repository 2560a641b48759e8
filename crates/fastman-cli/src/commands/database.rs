//! Alembic wrappers (`make:migration`, `database:migrate`, `migrate:*`)
//! and `database:seed`.
//!
//! Alembic and seeders run through the tool chain's run prefix so they come
//! from the project environment.

use std::path::PathBuf;

use fastman_core::application::{ApplicationError, Command, CommandDescriptor, CommandEnv};
use fastman_core::domain::naming::to_pascal_case;
use fastman_core::domain::{ArgumentVector, DomainError};
use fastman_core::error::FastmanResult;
use tracing::{instrument, warn};

use super::boxed;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![
        CommandDescriptor::new(
            "make:migration {message}",
            "Create a new Alembic migration",
            boxed(MakeMigration),
        )?,
        CommandDescriptor::new(
            "database:migrate",
            "Run pending migrations",
            boxed(|_| Migrate),
        )?,
        CommandDescriptor::new(
            "migrate:rollback {--steps=1} {--force}",
            "Rollback migrations",
            boxed(Rollback),
        )?,
        CommandDescriptor::new(
            "migrate:reset {--force}",
            "Reset all migrations",
            boxed(Reset),
        )?,
        CommandDescriptor::new(
            "migrate:status",
            "Show current migration status",
            boxed(|_| Status),
        )?,
        CommandDescriptor::new(
            "database:seed {--class=}",
            "Run database seeders",
            boxed(Seed),
        )?,
    ])
}

/// Revision message safe for a file name: whitespace becomes `_`, anything
/// outside `[A-Za-z0-9_-]` is dropped. Empty results fall back to `update`.
fn sanitize_message(message: &str) -> String {
    let cleaned: String = message
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "update".into()
    } else {
        trimmed.into()
    }
}

/// Ask before a destructive step unless `--force` was given.
fn confirm_or_cancel(env: &CommandEnv<'_>, args: &ArgumentVector, prompt: &str) -> FastmanResult<()> {
    if args.flag("force") || env.out().confirm(prompt, false) {
        Ok(())
    } else {
        Err(ApplicationError::Cancelled.into())
    }
}

struct MakeMigration(ArgumentVector);

impl Command for MakeMigration {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let message = sanitize_message(self.0.positional_or(0, "update"));
        env.run(env.context.wrap(&[
            "alembic",
            "revision",
            "--autogenerate",
            "-m",
            &message,
        ]))?;

        let out = env.out();
        out.success(&format!("Migration created: {message}"));
        out.info("Review the migration file before running migrate");
        Ok(())
    }
}

struct Migrate;

impl Command for Migrate {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        env.out().info("Running migrations...");
        env.run(env.context.wrap(&["alembic", "upgrade", "head"]))?;
        env.out().success("Migrations completed");
        Ok(())
    }
}

struct Rollback(ArgumentVector);

impl Command for Rollback {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let steps: u32 = self.0.parse_option("steps", 1)?;
        if steps == 0 {
            return Err(DomainError::InvalidOption {
                option: "steps".into(),
                value: "0".into(),
                reason: "must be a positive integer".into(),
            }
            .into());
        }

        confirm_or_cancel(env, &self.0, &format!("Rollback {steps} migration(s)?"))?;

        let target = format!("-{steps}");
        env.run(env.context.wrap(&["alembic", "downgrade", &target]))?;
        env.out()
            .success(&format!("Rolled back {steps} migration(s)"));
        Ok(())
    }
}

struct Reset(ArgumentVector);

impl Command for Reset {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        confirm_or_cancel(env, &self.0, "Reset ALL migrations? This cannot be undone!")?;
        env.run(env.context.wrap(&["alembic", "downgrade", "base"]))?;
        env.out().success("Database reset complete");
        Ok(())
    }
}

struct Status;

impl Command for Status {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        env.run(env.context.wrap(&["alembic", "current"]))
    }
}

// ── database:seed ─────────────────────────────────────────────────────────

const SEEDERS_DIR: &str = "database/seeders";
const SEEDER_SUFFIX: &str = "_seeder.py";

/// Runs every `*Seeder` class of the module named by `argv[1]` against a
/// fresh `SessionLocal`.
const SEED_RUNNER: &str = r#"import importlib, sys
sys.path.insert(0, ".")
from app.core.database import SessionLocal
module = importlib.import_module("database.seeders." + sys.argv[1])
db = SessionLocal()
try:
    for name in dir(module):
        if name.endswith("Seeder") and name != "Seeder":
            getattr(module, name).run(db)
finally:
    db.close()
"#;

/// Module names of `database/seeders/*_seeder.py`, sorted.
fn seeder_modules(env: &CommandEnv<'_>) -> FastmanResult<Vec<String>> {
    let dir = env.context.path(SEEDERS_DIR);
    if !env.fs().is_dir(&dir) {
        return Err(DomainError::Precondition {
            message: "Seeders directory not found".into(),
            hint: Some(format!("Create {SEEDERS_DIR}/<name>{SEEDER_SUFFIX}")),
        }
        .into());
    }

    let mut modules: Vec<String> = env
        .fs()
        .walk(&dir, &[])?
        .into_iter()
        .filter(|path| path.parent() == Some(dir.as_path()) && !env.fs().is_dir(path))
        .filter_map(|path: PathBuf| {
            let file = path.file_name()?.to_str()?;
            file.strip_suffix(".py")
                .filter(|_| file.ends_with(SEEDER_SUFFIX))
                .map(str::to_string)
        })
        .collect();
    modules.sort();
    Ok(modules)
}

/// `--class` matches the module name or its PascalCase form.
fn selected(module: &str, class: Option<&str>) -> bool {
    class.is_none_or(|class| class == module || class == to_pascal_case(module))
}

struct Seed(ArgumentVector);

impl Command for Seed {
    #[instrument(skip_all, fields(command = "database:seed"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let class = self.0.option("class");
        let modules: Vec<String> = seeder_modules(env)?
            .into_iter()
            .filter(|module| selected(module, class))
            .collect();

        let out = env.out();
        if modules.is_empty() {
            out.warning("No seeders found");
            return Ok(());
        }

        let mut failed = 0usize;
        for module in &modules {
            out.info(&format!("Running {}...", to_pascal_case(module)));
            let argv = env
                .context
                .wrap(&[env.context.python(), "-c", SEED_RUNNER, module.as_str()]);
            match env.run(argv) {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(error = %e, seeder = %module, "seeder failed");
                    out.error(&format!("Seeder {module} failed: {e}"));
                    failed += 1;
                }
            }
        }

        let ran = modules.len() - failed;
        if ran > 0 {
            out.success(&format!("Ran {ran} seeder(s)"));
        }
        if failed > 0 {
            return Err(DomainError::Precondition {
                message: format!("{failed} of {} seeder(s) failed", modules.len()),
                hint: None,
            }
            .into());
        }
        Ok(())
    }
}
