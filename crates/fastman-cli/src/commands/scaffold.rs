//! `make:*` generators.
//!
//! Each generator validates the name, refuses to touch an existing target,
//! and hands a [`ScaffoldPlan`] to the [`ScaffoldService`], which writes
//! the files or rolls back everything it created.

use std::path::Path;

use fastman_adapters::plugins::DEFAULT_PLUGIN_DIR;
use fastman_core::application::{
    ApplicationError, Command, CommandDescriptor, CommandEnv, ScaffoldReport, ScaffoldService,
};
use fastman_core::domain::naming::validate_identifier;
use fastman_core::domain::{ArgumentVector, DomainError, RenderContext, ScaffoldPlan};
use fastman_core::error::FastmanResult;
use tracing::instrument;

use super::boxed;
use crate::templates::scaffold as tpl;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![
        CommandDescriptor::new(
            "make:feature {name} {--crud}",
            "Create a vertical slice feature",
            boxed(MakeFeature),
        )?,
        CommandDescriptor::new(
            "make:model {name} {--table=}",
            "Create a SQLAlchemy model",
            boxed(MakeModel),
        )?,
        CommandDescriptor::new(
            "make:service {name}",
            "Create a service class",
            boxed(MakeService),
        )?,
        CommandDescriptor::new(
            "make:schema {name}",
            "Create Pydantic schemas",
            boxed(MakeSchema),
        )?,
        CommandDescriptor::new(
            "make:command {name}",
            "Create a custom CLI command",
            boxed(MakeCommand),
        )?,
        CommandDescriptor::new(
            "make:controller {name}",
            "Create a controller class",
            boxed(|args| MakeModule { args, kind: ModuleKind::Controller }),
        )?,
        CommandDescriptor::new(
            "make:repository {name}",
            "Create repository pattern class",
            boxed(|args| MakeModule { args, kind: ModuleKind::Repository }),
        )?,
        CommandDescriptor::new(
            "make:middleware {name}",
            "Create HTTP middleware",
            boxed(|args| MakeModule { args, kind: ModuleKind::Middleware }),
        )?,
        CommandDescriptor::new(
            "make:dependency {name}",
            "Create FastAPI dependency",
            boxed(|args| MakeModule { args, kind: ModuleKind::Dependency }),
        )?,
        CommandDescriptor::new(
            "make:exception {name}",
            "Create custom exception class",
            boxed(|args| MakeModule { args, kind: ModuleKind::Exception }),
        )?,
        CommandDescriptor::new(
            "make:api {name} {--style=rest}",
            "Create a lightweight API endpoint (rest or graphql)",
            boxed(MakeApi),
        )?,
        CommandDescriptor::new(
            "make:websocket {name}",
            "Create WebSocket feature with connection manager",
            boxed(MakeWebsocket),
        )?,
    ])
}

/// First positional, validated as a Python identifier.
fn name_arg<'a>(args: &'a ArgumentVector, label: &str) -> Result<&'a str, DomainError> {
    validate_identifier(args.require_positional(0, label)?)
}

/// Fail with `AlreadyExists` if `relative` is present under the project.
fn ensure_absent(env: &CommandEnv<'_>, relative: &str, what: String) -> FastmanResult<()> {
    let path = env.context.path(relative);
    if env.fs().exists(&path) {
        return Err(ApplicationError::AlreadyExists { what, path }.into());
    }
    Ok(())
}

fn apply(env: &CommandEnv<'_>, plan: &ScaffoldPlan) -> FastmanResult<ScaffoldReport> {
    ScaffoldService::new(env.fs()).apply(plan)
}

// ── make:feature ──────────────────────────────────────────────────────────

struct MakeFeature(ArgumentVector);

impl Command for MakeFeature {
    #[instrument(skip_all, fields(command = "make:feature"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "Feature name")?;

        let features = env.context.path("app/features");
        if !env.fs().is_dir(&features) {
            return Err(DomainError::Precondition {
                message: "Features directory not found. Is this a feature-pattern project?"
                    .into(),
                hint: Some(
                    "Create app/features or start with 'fastman new <name> --pattern=feature'"
                        .into(),
                ),
            }
            .into());
        }

        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        ensure_absent(env, &format!("app/features/{snake}"), format!("Feature '{snake}'"))?;

        let router = if self.0.flag("crud") {
            tpl::FEATURE_ROUTER_CRUD
        } else {
            tpl::FEATURE_ROUTER_BASIC
        };
        let slice = Path::new(&snake);
        let plan = ScaffoldPlan::new(features)
            .with_package(&snake)
            .with_file(slice.join("models.py"), vars.render(tpl::FEATURE_MODEL))
            .with_file(slice.join("schemas.py"), vars.render(tpl::FEATURE_SCHEMAS))
            .with_file(slice.join("service.py"), vars.render(tpl::FEATURE_SERVICE))
            .with_file(slice.join("router.py"), vars.render(router));

        let report = apply(env, &plan)?;

        let out = env.out();
        out.success(&format!("Feature '{snake}' created at app/features/{snake}"));
        for file in &report.written {
            out.line(&format!("  app/features/{}", file.display()));
        }
        out.info("The router is picked up automatically at startup");
        Ok(())
    }
}

// ── make:model ────────────────────────────────────────────────────────────

struct MakeModel(ArgumentVector);

impl Command for MakeModel {
    #[instrument(skip_all, fields(command = "make:model"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "Model name")?;
        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let pascal = vars.get("pascal").unwrap_or(name).to_string();
        let relative = format!("app/models/{snake}.py");
        ensure_absent(env, &relative, format!("Model '{pascal}'"))?;

        let table = match self.0.option("table") {
            Some(table) => validate_identifier(table)?.to_string(),
            None => vars.get("plural").unwrap_or(&snake).to_string(),
        };
        let vars = vars.with("table", table);

        let mut plan = ScaffoldPlan::new(env.context.project_root()).with_package("app/models");
        if let Some(init) = model_imports(env, &snake, &pascal)? {
            plan.add_file_overwriting("app/models/__init__.py", init);
        }
        plan.add_file(&relative, vars.render(tpl::MODEL));
        apply(env, &plan)?;

        env.out()
            .success(&format!("Model '{pascal}' created at {relative}"));
        Ok(())
    }
}

/// `app/models/__init__.py` with `from .<snake> import <Pascal>` appended
/// so Alembic's autogenerate sees the model, or `None` if already there.
fn model_imports(env: &CommandEnv<'_>, snake: &str, pascal: &str) -> FastmanResult<Option<String>> {
    let init = env.context.path("app/models/__init__.py");
    let import = format!("from .{snake} import {pascal}");

    let mut content = if env.fs().exists(&init) {
        env.fs().read_to_string(&init)?
    } else {
        String::new()
    };
    if content.lines().any(|l| l.trim() == import) {
        return Ok(None);
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&import);
    content.push('\n');
    Ok(Some(content))
}

// ── make:service / make:schema ────────────────────────────────────────────

struct MakeService(ArgumentVector);

impl Command for MakeService {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "Service name")?;
        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let relative = format!("app/services/{snake}_service.py");
        ensure_absent(env, &relative, format!("Service '{snake}'"))?;

        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_package("app/services")
            .with_file(&relative, vars.render(tpl::SERVICE));
        apply(env, &plan)?;

        env.out()
            .success(&format!("Service '{snake}' created at {relative}"));
        Ok(())
    }
}

struct MakeSchema(ArgumentVector);

impl Command for MakeSchema {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "Schema name")?;
        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let relative = format!("app/schemas/{snake}.py");
        ensure_absent(env, &relative, format!("Schema '{snake}'"))?;

        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_package("app/schemas")
            .with_file(&relative, vars.render(tpl::SCHEMA));
        apply(env, &plan)?;

        env.out()
            .success(&format!("Schema '{snake}' created at {relative}"));
        Ok(())
    }
}

// ── make:command ──────────────────────────────────────────────────────────

/// Writes a plugin manifest plus the script it runs.
struct MakeCommand(ArgumentVector);

impl Command for MakeCommand {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "Command name")?;
        let vars = RenderContext::for_name(name)
            .with("python", env.context.python())
            .with("dir", DEFAULT_PLUGIN_DIR);
        let snake = vars.get("snake").unwrap_or(name).to_string();

        let manifest = format!("{DEFAULT_PLUGIN_DIR}/{snake}.toml");
        let script = format!("{DEFAULT_PLUGIN_DIR}/{snake}.py");
        ensure_absent(env, &manifest, format!("Command '{snake}'"))?;
        ensure_absent(env, &script, format!("Command script '{snake}'"))?;

        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_directory(DEFAULT_PLUGIN_DIR)
            .with_file(&manifest, vars.render(tpl::COMMAND_MANIFEST))
            .with_file(&script, vars.render(tpl::COMMAND_SCRIPT));
        apply(env, &plan)?;

        let out = env.out();
        out.success(&format!("Command 'custom:{snake}' created at {script}"));
        out.info(&format!("Usage: fastman custom:{snake}"));
        Ok(())
    }
}

// ── single-module generators ──────────────────────────────────────────────

/// Generators that write one Python module into one package.
#[derive(Debug, Clone, Copy)]
enum ModuleKind {
    Controller,
    Repository,
    Middleware,
    Dependency,
    Exception,
}

impl ModuleKind {
    fn label(self) -> &'static str {
        match self {
            Self::Controller => "Controller",
            Self::Repository => "Repository",
            Self::Middleware => "Middleware",
            Self::Dependency => "Dependency",
            Self::Exception => "Exception",
        }
    }

    /// Packages created before the module, parents first.
    fn packages(self) -> &'static [&'static str] {
        match self {
            Self::Controller => &["app/http", "app/http/controllers"],
            Self::Repository => &["app/repositories"],
            Self::Middleware => &["app/middleware"],
            Self::Dependency => &["app/dependencies"],
            Self::Exception => &["app/core", "app/core/exceptions"],
        }
    }

    fn relative_path(self, snake: &str) -> String {
        match self {
            Self::Controller => format!("app/http/controllers/{snake}.py"),
            Self::Repository => format!("app/repositories/{snake}_repository.py"),
            Self::Middleware => format!("app/middleware/{snake}.py"),
            Self::Dependency => format!("app/dependencies/{snake}.py"),
            Self::Exception => format!("app/core/exceptions/{snake}.py"),
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Controller => tpl::CONTROLLER,
            Self::Repository => tpl::REPOSITORY,
            Self::Middleware => tpl::MIDDLEWARE,
            Self::Dependency => tpl::DEPENDENCY,
            Self::Exception => tpl::EXCEPTION,
        }
    }
}

/// `Pascal` with an `Exception` suffix, unless it already has one.
fn exception_class(pascal: &str) -> String {
    if pascal.ends_with("Exception") {
        pascal.to_string()
    } else {
        format!("{pascal}Exception")
    }
}

struct MakeModule {
    args: ArgumentVector,
    kind: ModuleKind,
}

impl Command for MakeModule {
    #[instrument(skip_all, fields(kind = self.kind.label()))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let kind = self.kind;
        let name = name_arg(&self.args, &format!("{} name", kind.label()))?;
        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let pascal = vars.get("pascal").unwrap_or(name).to_string();
        let exception = exception_class(&pascal);
        let vars = vars.with("exception", exception.as_str());

        let relative = kind.relative_path(&snake);
        let display = match kind {
            ModuleKind::Exception => exception.clone(),
            _ => pascal.clone(),
        };
        ensure_absent(env, &relative, format!("{} '{display}'", kind.label()))?;

        let mut plan = ScaffoldPlan::new(env.context.project_root());
        for package in kind.packages() {
            plan.add_package(*package);
        }
        plan.add_file(&relative, vars.render(kind.template()));
        apply(env, &plan)?;

        let out = env.out();
        out.success(&format!("{} '{display}' created at {relative}", kind.label()));
        match kind {
            ModuleKind::Middleware => {
                out.info("Add to app/main.py:");
                out.line(&format!("  from app.middleware.{snake} import {pascal}Middleware"));
                out.line(&format!("  app.add_middleware({pascal}Middleware)"));
            }
            ModuleKind::Dependency => {
                out.info("Use in routes:");
                out.line(&format!("  from app.dependencies.{snake} import get_{snake}"));
                out.line(&format!("  async def route(dep = Depends(get_{snake})):"));
            }
            ModuleKind::Repository => {
                if !env.fs().exists(&env.context.path(&format!("app/models/{snake}.py"))) {
                    out.info(&format!("Expects app/models/{snake}.py: run 'fastman make:model {pascal}'"));
                }
            }
            ModuleKind::Controller | ModuleKind::Exception => {}
        }
        Ok(())
    }
}

// ── make:api ──────────────────────────────────────────────────────────────

struct MakeApi(ArgumentVector);

impl Command for MakeApi {
    #[instrument(skip_all, fields(command = "make:api"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "API name")?;
        let style = self.0.option_or("style", "rest").to_ascii_lowercase();
        let (file, template) = match style.as_str() {
            "rest" => ("router.py", tpl::API_REST),
            "graphql" => ("schema.py", tpl::API_GRAPHQL),
            _ => {
                return Err(DomainError::InvalidOption {
                    option: "style".into(),
                    value: style,
                    reason: "must be 'rest' or 'graphql'".into(),
                }
                .into());
            }
        };

        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let dir = format!("app/api/{snake}");
        ensure_absent(env, &dir, format!("API '{snake}'"))?;

        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_package("app/api")
            .with_package(&dir)
            .with_file(Path::new(&dir).join(file), vars.render(template));
        apply(env, &plan)?;

        let out = env.out();
        if style == "graphql" {
            out.success(&format!("GraphQL API '{snake}' created at {dir}/"));
            out.info("Mount the schema with strawberry's GraphQLRouter at /graphql");
        } else {
            out.success(&format!("REST API '{snake}' created at {dir}/"));
            out.info("Endpoints:");
            out.line(&format!("  GET /api/{snake}"));
            out.line(&format!("  GET /api/{snake}/{{id}}"));
        }
        Ok(())
    }
}

// ── make:websocket ────────────────────────────────────────────────────────

struct MakeWebsocket(ArgumentVector);

impl Command for MakeWebsocket {
    #[instrument(skip_all, fields(command = "make:websocket"))]
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let name = name_arg(&self.0, "WebSocket name")?;
        let vars = RenderContext::for_name(name);
        let snake = vars.get("snake").unwrap_or(name).to_string();
        let dir = format!("app/features/{snake}");
        ensure_absent(env, &dir, format!("Feature '{snake}'"))?;

        let slice = Path::new(&dir);
        let plan = ScaffoldPlan::new(env.context.project_root())
            .with_package("app/features")
            .with_package(&dir)
            .with_file(slice.join("manager.py"), vars.render(tpl::WEBSOCKET_MANAGER))
            .with_file(slice.join("router.py"), vars.render(tpl::WEBSOCKET_ROUTER));
        apply(env, &plan)?;

        let out = env.out();
        out.success(&format!("WebSocket feature '{snake}' created"));
        out.info(&format!("Connect to: ws://localhost:8000/ws/{snake}"));
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
