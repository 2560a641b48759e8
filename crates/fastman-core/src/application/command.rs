//! Commands, their descriptors and the environment they run in.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::context::InvocationContext;
use super::error::ApplicationError;
use super::ports::{Filesystem, ProcessOutcome, ProcessRunner, ProcessSpec, Reporter};
use super::registry::CommandRegistry;
use crate::domain::{ArgumentVector, DomainError, OptionStyle, ParseRules, Signature};
use crate::error::FastmanResult;

/// A constructed command bound to its arguments.
pub trait Command {
    /// Run the command. Caller-input problems are returned as
    /// [`DomainError`]s; everything else is treated as a failure.
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()>;
}

/// Builds a command handler from its parsed arguments.
pub type CommandFactory = Box<dyn Fn(ArgumentVector) -> Box<dyn Command> + Send + Sync>;

/// Listing group a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CommandCategory {
    ProjectSetup,
    Development,
    Scaffolding,
    Database,
    PackageManagement,
    Configuration,
    Cache,
    Utilities,
}

impl CommandCategory {
    /// Display order of the listing.
    pub const ALL: [CommandCategory; 8] = [
        Self::ProjectSetup,
        Self::Development,
        Self::Scaffolding,
        Self::Database,
        Self::PackageManagement,
        Self::Configuration,
        Self::Cache,
        Self::Utilities,
    ];

    /// Derive the category from a command name.
    pub fn of(name: &str) -> Self {
        const NOT_SCAFFOLDING: [&str; 4] =
            ["make:migration", "make:seeder", "make:factory", "make:test"];

        match name {
            "new" | "init" => Self::ProjectSetup,
            "serve" | "build" => Self::Development,
            n if n.starts_with("make:") && !NOT_SCAFFOLDING.contains(&n) => Self::Scaffolding,
            n if n.starts_with("database:")
                || n.starts_with("migrate")
                || n == "make:migration"
                || n == "make:seeder" =>
            {
                Self::Database
            }
            n if n.starts_with("package:") => Self::PackageManagement,
            n if n.starts_with("config:") || n.starts_with("generate:") => Self::Configuration,
            n if n.starts_with("cache:") => Self::Cache,
            _ => Self::Utilities,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ProjectSetup => "Project Setup",
            Self::Development => "Development",
            Self::Scaffolding => "Scaffolding",
            Self::Database => "Database",
            Self::PackageManagement => "Package Management",
            Self::Configuration => "Configuration",
            Self::Cache => "Cache",
            Self::Utilities => "Utilities",
        }
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A registered command: name, description, signature and factory.
///
/// Immutable once built.
pub struct CommandDescriptor {
    name: String,
    description: String,
    signature: Signature,
    category: CommandCategory,
    factory: CommandFactory,
}

impl CommandDescriptor {
    /// Descriptor named by the first token of `signature`.
    pub fn new<F>(
        signature: &str,
        description: impl Into<String>,
        factory: F,
    ) -> Result<Self, DomainError>
    where
        F: Fn(ArgumentVector) -> Box<dyn Command> + Send + Sync + 'static,
    {
        Self::build(None, signature, description.into(), Box::new(factory))
    }

    /// Like [`CommandDescriptor::new`], but `fallback` names the command when
    /// the signature is empty.
    pub fn with_fallback_name<F>(
        fallback: &str,
        signature: &str,
        description: impl Into<String>,
        factory: F,
    ) -> Result<Self, DomainError>
    where
        F: Fn(ArgumentVector) -> Box<dyn Command> + Send + Sync + 'static,
    {
        Self::build(Some(fallback), signature, description.into(), Box::new(factory))
    }

    fn build(
        fallback: Option<&str>,
        signature: &str,
        description: String,
        factory: CommandFactory,
    ) -> Result<Self, DomainError> {
        let signature = Signature::parse(signature)?;
        let name = signature
            .name()
            .or(fallback)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::InvalidSignature {
                signature: signature.to_string(),
                reason: "no command name and no fallback name".into(),
            })?
            .to_string();

        Ok(Self {
            category: CommandCategory::of(&name),
            name,
            description,
            signature,
            factory,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn category(&self) -> CommandCategory {
        self.category
    }

    /// How this command's arguments are classified under `style`.
    pub fn parse_rules(&self, style: OptionStyle) -> ParseRules {
        ParseRules::for_signature(&self.signature, style)
    }

    /// Construct the handler.
    pub fn instantiate(&self, args: ArgumentVector) -> Box<dyn Command> {
        (self.factory)(args)
    }

    pub fn summary(&self) -> CommandSummary<'_> {
        CommandSummary {
            name: &self.name,
            description: &self.description,
            category: self.category.title(),
            usage: self.signature.usage(),
            parameters: &self.signature,
        }
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("signature", &self.signature.as_str())
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a descriptor for machine-readable listings.
#[derive(Debug, Serialize)]
pub struct CommandSummary<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub category: &'static str,
    pub usage: String,
    #[serde(rename = "signature")]
    pub parameters: &'a Signature,
}

/// Adapters a command may use.
pub struct Runtime {
    pub filesystem: Box<dyn Filesystem>,
    pub runner: Box<dyn ProcessRunner>,
    pub reporter: Box<dyn Reporter>,
}

impl Runtime {
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn ProcessRunner>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            filesystem,
            runner,
            reporter,
        }
    }
}

/// Everything a running command can see.
#[derive(Clone, Copy)]
pub struct CommandEnv<'a> {
    pub context: &'a InvocationContext,
    pub registry: &'a CommandRegistry,
    pub runtime: &'a Runtime,
}

impl<'a> CommandEnv<'a> {
    pub fn new(
        context: &'a InvocationContext,
        registry: &'a CommandRegistry,
        runtime: &'a Runtime,
    ) -> Self {
        Self {
            context,
            registry,
            runtime,
        }
    }

    pub fn fs(&self) -> &'a dyn Filesystem {
        self.runtime.filesystem.as_ref()
    }

    pub fn out(&self) -> &'a dyn Reporter {
        self.runtime.reporter.as_ref()
    }

    /// Run `argv` with inherited stdio; a non-zero exit is an error.
    ///
    /// If the user pressed Ctrl-C while the child ran, the result is
    /// [`ApplicationError::Cancelled`] regardless of the exit status.
    pub fn run(&self, argv: Vec<String>) -> FastmanResult<()> {
        self.run_in(self.context.project_root(), argv)
    }

    /// [`CommandEnv::run`] with `dir` as the working directory.
    pub fn run_in(&self, dir: &Path, argv: Vec<String>) -> FastmanResult<()> {
        let spec = ProcessSpec::from_argv(argv)?.cwd(dir);
        let outcome = self.spawn(&spec)?;
        if outcome.success() {
            Ok(())
        } else {
            Err(ApplicationError::ProcessFailed {
                command: spec.to_string(),
                code: outcome.code,
            }
            .into())
        }
    }

    /// Run `argv` with captured output. The exit status is returned, not
    /// checked.
    pub fn capture(&self, argv: Vec<String>) -> FastmanResult<ProcessOutcome> {
        let spec = ProcessSpec::from_argv(argv)?
            .cwd(self.context.project_root())
            .captured();
        self.spawn(&spec)
    }

    fn spawn(&self, spec: &ProcessSpec) -> FastmanResult<ProcessOutcome> {
        tracing::debug!(command = %spec, "running child process");
        let outcome = self.runtime.runner.run(spec)?;
        if self.context.interrupt().is_set() {
            return Err(ApplicationError::Cancelled.into());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Command for Noop {
        fn execute(&self, _env: &CommandEnv<'_>) -> FastmanResult<()> {
            Ok(())
        }
    }

    fn noop(_: ArgumentVector) -> Box<dyn Command> {
        Box::new(Noop)
    }

    #[test]
    fn name_is_first_signature_token() {
        let d = CommandDescriptor::new("make:feature {name} {--crud}", "Create", noop).unwrap();
        assert_eq!(d.name(), "make:feature");
        assert_eq!(d.category(), CommandCategory::Scaffolding);
    }

    #[test]
    fn empty_signature_uses_fallback() {
        let d = CommandDescriptor::with_fallback_name("doctor", "", "Check", noop).unwrap();
        assert_eq!(d.name(), "doctor");
        assert!(CommandDescriptor::new("   ", "nameless", noop).is_err());
    }

    #[test]
    fn categories_follow_name_rules() {
        use CommandCategory::*;
        let cases = [
            ("new", ProjectSetup),
            ("init", ProjectSetup),
            ("serve", Development),
            ("make:model", Scaffolding),
            ("make:migration", Database),
            ("migrate:rollback", Database),
            ("database:migrate", Database),
            ("package:import", PackageManagement),
            ("generate:key", Configuration),
            ("cache:clear", Cache),
            ("completion", Utilities),
            ("report:daily", Utilities),
        ];
        for (name, expected) in cases {
            assert_eq!(CommandCategory::of(name), expected, "{name}");
        }
    }

    #[test]
    fn summary_serializes() {
        let d = CommandDescriptor::new("make:model {name} {--table=}", "Create a model", noop)
            .unwrap();
        let json = serde_json::to_value(d.summary()).unwrap();
        assert_eq!(json["name"], "make:model");
        assert_eq!(json["category"], "Scaffolding");
        assert_eq!(json["usage"], "make:model <name> [--table=<value>]");
    }
}
