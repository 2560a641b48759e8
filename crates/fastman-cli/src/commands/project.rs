//! Project setup: `fastman new` and `fastman init`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use fastman_adapters::plugins::DEFAULT_PLUGIN_DIR;
use fastman_core::application::{
    ApplicationError, Command, CommandDescriptor, CommandEnv, ScaffoldService,
};
use fastman_core::domain::naming::validate_path_component;
use fastman_core::domain::{ArgumentVector, DomainError, RenderContext, ScaffoldPlan, Toolchain};
use fastman_core::error::{Context as _, FastmanResult};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::boxed;
use super::utilities::secret_key;
use crate::config::PROJECT_CONFIG_FILE;
use crate::templates::project as tpl;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![
        CommandDescriptor::new(
            "new {name} {--minimal} {--pattern=feature} {--package=uv} {--database=sqlite} {--install}",
            "Create a new FastAPI project",
            boxed(New),
        )?,
        CommandDescriptor::new(
            "init {--force}",
            "Initialize Fastman in an existing project",
            boxed(Init),
        )?,
    ])
}

// ── Project options ───────────────────────────────────────────────────────

/// Source layout of a generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Vertical slices under `app/features`.
    Feature,
    Api,
    /// Controllers, services and repositories.
    Layer,
}

impl Pattern {
    const ALL: [Pattern; 3] = [Self::Feature, Self::Api, Self::Layer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Api => "api",
            Self::Layer => "layer",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Feature => "Vertical slices, one package per feature",
            Self::Api => "Lightweight API endpoints with shared schemas",
            Self::Layer => "Controllers, services and repositories",
        }
    }

    /// Python packages under `app/` besides `core` and `models`.
    fn packages(self) -> &'static [&'static str] {
        match self {
            Self::Feature => &["app/features", "app/api"],
            Self::Api => &["app/api", "app/schemas"],
            Self::Layer => &[
                "app/controllers",
                "app/services",
                "app/repositories",
                "app/schemas",
            ],
        }
    }

    fn structure(self) -> &'static str {
        match self {
            Self::Feature => tpl::STRUCTURE_FEATURE,
            Self::Api => tpl::STRUCTURE_API,
            Self::Layer => tpl::STRUCTURE_LAYER,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| DomainError::InvalidOption {
                option: "pattern".into(),
                value: s.to_string(),
                reason: "Must be one of: feature, api, layer".into(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    Sqlite,
    Postgresql,
    Mysql,
}

impl Database {
    const ALL: [Database; 3] = [Self::Sqlite, Self::Postgresql, Self::Mysql];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    /// Driver package, if the database needs one.
    fn driver(self) -> Option<&'static str> {
        match self {
            Self::Sqlite => None,
            Self::Postgresql => Some("psycopg2-binary"),
            Self::Mysql => Some("pymysql"),
        }
    }

    fn env_section(self) -> &'static str {
        match self {
            Self::Sqlite => tpl::ENV_SQLITE,
            Self::Postgresql => tpl::ENV_POSTGRESQL,
            Self::Mysql => tpl::ENV_MYSQL,
        }
    }

    fn database_module(self, vars: &RenderContext) -> String {
        match self {
            Self::Sqlite => vars.render(tpl::DATABASE_SQLITE),
            Self::Postgresql => vars
                .clone()
                .with("database_label", "PostgreSQL")
                .render(tpl::DATABASE_SERVER),
            Self::Mysql => vars
                .clone()
                .with("database_label", "MySQL")
                .render(tpl::DATABASE_SERVER),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| DomainError::InvalidOption {
                option: "database".into(),
                value: s.to_string(),
                reason: "Must be one of: sqlite, postgresql, mysql".into(),
            })
    }
}

/// Everything `new` needs to lay out a project.
#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: String,
    pub pattern: Pattern,
    pub toolchain: Toolchain,
    pub database: Database,
    pub minimal: bool,
}

impl ProjectSpec {
    fn from_args(args: &ArgumentVector) -> Result<Self, DomainError> {
        let name = validate_path_component(args.require_positional(0, "Project name")?)?;
        if name.starts_with('.') || name.starts_with('-') {
            return Err(DomainError::InvalidName {
                name: name.to_string(),
                reason: "Project names cannot start with '.' or '-'".into(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            pattern: args.option_or("pattern", "feature").parse()?,
            toolchain: args.option_or("package", "uv").parse()?,
            database: args.option_or("database", "sqlite").parse()?,
            minimal: args.flag("minimal"),
        })
    }

    /// Runtime dependencies, plus test tooling unless minimal.
    fn dependencies(&self) -> Vec<String> {
        let mut deps = vec![
            "fastapi",
            "uvicorn[standard]",
            "pydantic-settings",
            "python-dotenv",
            "sqlalchemy",
            "alembic",
        ];
        deps.extend(self.database.driver());
        if !self.minimal {
            deps.extend(["pytest", "httpx"]);
        }
        deps.into_iter().map(str::to_string).collect()
    }

    fn activate_hint(&self) -> &'static str {
        match self.toolchain {
            Toolchain::Uv => "# uv creates .venv on first sync",
            Toolchain::Poetry => "poetry shell",
            Toolchain::Pipenv => "pipenv shell",
            Toolchain::Pip => "python -m venv .venv\nsource .venv/bin/activate",
        }
    }
}

// ── Dependency manifests ──────────────────────────────────────────────────

#[derive(Serialize)]
struct PyProject<'a> {
    project: ProjectTable<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool: Option<ToolTable>,
}

#[derive(Serialize)]
struct ProjectTable<'a> {
    name: &'a str,
    version: &'static str,
    description: String,
    #[serde(rename = "requires-python")]
    requires_python: &'static str,
    dependencies: Vec<String>,
}

#[derive(Serialize)]
struct ToolTable {
    poetry: PoetryTable,
}

/// Application projects are not installable packages.
#[derive(Serialize)]
struct PoetryTable {
    #[serde(rename = "package-mode")]
    package_mode: bool,
}

#[derive(Serialize)]
struct Pipfile {
    source: Vec<PipfileSource>,
    packages: BTreeMap<String, &'static str>,
    requires: BTreeMap<&'static str, &'static str>,
}

#[derive(Serialize)]
struct PipfileSource {
    url: &'static str,
    verify_ssl: bool,
    name: &'static str,
}

/// `(file name, content)` of the manifest the tool chain reads.
fn dependency_manifest(spec: &ProjectSpec) -> FastmanResult<(&'static str, String)> {
    let deps = spec.dependencies();
    match spec.toolchain {
        Toolchain::Uv | Toolchain::Poetry => {
            let pyproject = PyProject {
                project: ProjectTable {
                    name: &spec.name,
                    version: "0.1.0",
                    description: format!("{} - FastAPI application", spec.name),
                    requires_python: ">=3.10",
                    dependencies: deps,
                },
                tool: (spec.toolchain == Toolchain::Poetry).then_some(ToolTable {
                    poetry: PoetryTable {
                        package_mode: false,
                    },
                }),
            };
            let content = toml::to_string(&pyproject).context("rendering pyproject.toml")?;
            Ok(("pyproject.toml", content))
        }
        Toolchain::Pipenv => {
            let pipfile = Pipfile {
                source: vec![PipfileSource {
                    url: "https://pypi.org/simple",
                    verify_ssl: true,
                    name: "pypi",
                }],
                packages: deps.into_iter().map(|d| (d, "*")).collect(),
                requires: BTreeMap::from([("python_version", "3")]),
            };
            let content = toml::to_string(&pipfile).context("rendering Pipfile")?;
            Ok(("Pipfile", content))
        }
        Toolchain::Pip => {
            let mut content = deps.join("\n");
            content.push('\n');
            Ok(("requirements.txt", content))
        }
    }
}

// ── new ───────────────────────────────────────────────────────────────────

/// The full project tree, rooted at the new project directory. `python` is
/// the interpreter pip installs run under.
fn project_plan(spec: &ProjectSpec, root: &Path, python: &str) -> FastmanResult<ScaffoldPlan> {
    let toolchain = spec.toolchain;
    let vars = RenderContext::new()
        .with("project_name", spec.name.as_str())
        .with("version", fastman_core::VERSION)
        .with("secret_key", secret_key())
        .with("pattern", spec.pattern.as_str())
        .with("pattern_description", spec.pattern.description())
        .with("package_manager", toolchain.as_str())
        .with("activate", spec.activate_hint())
        .with("install_command", toolchain.sync_argv(python).join(" "))
        .with("structure", spec.pattern.structure());

    let mut plan = ScaffoldPlan::new(root);
    plan.add_package("app");
    plan.add_package("app/core");
    plan.add_package("app/models");
    for package in spec.pattern.packages() {
        plan.add_package(*package);
    }
    plan.add_directory(DEFAULT_PLUGIN_DIR);
    if !spec.minimal {
        plan.add_package("tests");
    }
    plan.add_directory("alembic/versions");
    plan.add_directory("logs");

    plan.add_file("app/main.py", vars.render(tpl::MAIN_APP));
    plan.add_file("app/core/config.py", vars.render(tpl::CONFIG));
    plan.add_file("app/core/database.py", spec.database.database_module(&vars));
    plan.add_file("app/core/logging.py", vars.render(tpl::LOGGING));
    plan.add_file("app/core/discovery.py", vars.render(tpl::DISCOVERY));

    plan.add_file("alembic.ini", vars.render(tpl::ALEMBIC_INI));
    plan.add_file("alembic/env.py", vars.render(tpl::ALEMBIC_ENV));
    plan.add_file("alembic/script.py.mako", tpl::ALEMBIC_SCRIPT_MAKO);

    let env = format!(
        "{}{}",
        vars.render(tpl::ENV_BASE),
        vars.render(spec.database.env_section())
    );
    plan.add_file(".env", env);
    plan.add_file(".gitignore", tpl::GITIGNORE);
    plan.add_file(PROJECT_CONFIG_FILE, tpl::FASTMAN_TOML);
    plan.add_file("README.md", vars.render(tpl::README));

    let (manifest, content) = dependency_manifest(spec)?;
    plan.add_file(manifest, content);
    Ok(plan)
}

struct New(ArgumentVector);

impl Command for New {
    #[instrument(skip_all, fields(command = "new"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let spec = ProjectSpec::from_args(&self.0)?;
        let root = env.context.path(&spec.name);
        if env.fs().exists(&root) {
            return Err(ApplicationError::AlreadyExists {
                what: format!("Directory '{}'", spec.name),
                path: root,
            }
            .into());
        }

        let out = env.out();
        out.info(&format!("Creating new project: {}", spec.name));
        out.info(&format!("Pattern: {}", spec.pattern));
        out.info(&format!("Package Manager: {}", spec.toolchain));
        out.info(&format!("Database: {}", spec.database));

        let plan = project_plan(&spec, &root, env.context.python())?;
        let report = ScaffoldService::new(env.fs()).apply(&plan)?;
        info!(project = %spec.name, files = report.written.len(), "project created");

        let installed = self.0.flag("install") && install(env, &spec, &root)?;

        out.success(&format!("Project '{}' created successfully!", spec.name));
        out.line("");
        out.header("Next steps:");
        out.line(&format!("  cd {}", spec.name));
        match spec.toolchain {
            Toolchain::Poetry => out.line("  poetry shell"),
            Toolchain::Pipenv => out.line("  pipenv shell"),
            Toolchain::Uv | Toolchain::Pip => {}
        }
        if !installed {
            out.line(&format!("  {}", spec.toolchain.sync_argv(env.context.python()).join(" ")));
        }
        out.line("  fastman serve");
        Ok(())
    }
}

/// Sync dependencies inside the new project. A failed install keeps the
/// project and returns `false`; only cancellation aborts.
fn install(env: &CommandEnv<'_>, spec: &ProjectSpec, root: &Path) -> FastmanResult<bool> {
    env.out().info("Installing dependencies...");
    match env.run_in(root, spec.toolchain.sync_argv(env.context.python())) {
        Ok(()) => {
            env.out().success("Dependencies installed");
            Ok(true)
        }
        Err(e) if e.is_cancelled() => Err(e),
        Err(e) => {
            warn!(error = %e, "dependency install failed");
            env.out()
                .warning(&format!("Dependency installation failed: {e}"));
            Ok(false)
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────

struct Init(ArgumentVector);

impl Command for Init {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let out = env.out();
        if !self.0.flag("force") && !out.confirm("Initialize Fastman in current directory?", false) {
            return Err(ApplicationError::Cancelled.into());
        }

        out.info("Initializing Fastman...");
        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_package("app")
            .with_package("app/core")
            .with_package("app/features")
            .with_package("app/api")
            .with_directory(DEFAULT_PLUGIN_DIR)
            .with_file(".env", tpl::ENV_INIT)
            .with_file(".gitignore", tpl::GITIGNORE)
            .with_file(PROJECT_CONFIG_FILE, tpl::FASTMAN_TOML);
        let report = ScaffoldService::new(env.fs()).apply(&plan)?;

        for file in &report.written {
            out.line(&format!("  created {}", file.display()));
        }
        for file in &report.skipped {
            out.line(&format!("  kept    {}", file.display()));
        }
        out.success("Fastman initialized!");
        out.info("Run 'fastman list' to see available commands");
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
