//! `package:*`: dependency management through the detected tool chain.

use fastman_core::application::{Command, CommandDescriptor, CommandEnv};
use fastman_core::domain::{ArgumentVector, DomainError};
use fastman_core::error::FastmanResult;

use super::boxed;

const REQUIREMENTS: &str = "requirements.txt";

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![
        CommandDescriptor::new(
            "package:import {package}",
            "Install a package",
            boxed(Import),
        )?,
        CommandDescriptor::new(
            "package:remove {package}",
            "Remove a package",
            boxed(Remove),
        )?,
        CommandDescriptor::new(
            "package:list",
            "List installed packages",
            boxed(|_| List),
        )?,
    ])
}

/// Every positional is a package; at least one is required.
fn packages(args: &ArgumentVector) -> Result<Vec<String>, DomainError> {
    args.require_positional(0, "Package name")?;
    Ok(args.positionals().map(str::to_string).collect())
}

/// Distribution name of a requirement line, lower-cased with `_` folded
/// to `-` (`Flask_Login>=0.6` → `flask-login`).
fn requirement_name(spec: &str) -> String {
    let end = spec
        .find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | ';' | '[' | ' ' | '@'))
        .unwrap_or(spec.len());
    spec[..end].trim().to_ascii_lowercase().replace('_', "-")
}

struct Import(ArgumentVector);

impl Command for Import {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let packages = packages(&self.0)?;
        let label = packages.join(" ");
        let toolchain = env.context.toolchain();

        env.out().info(&format!("Installing {label}..."));
        env.run(toolchain.install_argv(env.context.python(), &packages))?;

        if toolchain.tracks_requirements_file() {
            record_requirements(env, &packages)?;
        }
        env.out().success(&format!("Package '{label}' installed"));
        Ok(())
    }
}

/// Append packages missing from an existing `requirements.txt`.
fn record_requirements(env: &CommandEnv<'_>, packages: &[String]) -> FastmanResult<()> {
    let path = env.context.path(REQUIREMENTS);
    if !env.fs().exists(&path) {
        return Ok(());
    }

    let mut content = env.fs().read_to_string(&path)?;
    let present: Vec<String> = content.lines().map(requirement_name).collect();
    let missing: Vec<&String> = packages
        .iter()
        .filter(|p| !present.contains(&requirement_name(p)))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for package in missing {
        content.push_str(package);
        content.push('\n');
    }
    env.fs().write_file(&path, &content)
}

struct Remove(ArgumentVector);

impl Command for Remove {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let packages = packages(&self.0)?;
        let label = packages.join(" ");
        let toolchain = env.context.toolchain();

        env.out().info(&format!("Removing {label}..."));
        env.run(toolchain.remove_argv(env.context.python(), &packages))?;

        if toolchain.tracks_requirements_file() {
            forget_requirements(env, &packages)?;
        }
        env.out().success(&format!("Package '{label}' removed"));
        Ok(())
    }
}

fn forget_requirements(env: &CommandEnv<'_>, packages: &[String]) -> FastmanResult<()> {
    let path = env.context.path(REQUIREMENTS);
    if !env.fs().exists(&path) {
        return Ok(());
    }

    let removed: Vec<String> = packages.iter().map(|p| requirement_name(p)).collect();
    let content = env.fs().read_to_string(&path)?;
    let mut pruned = false;
    let mut kept = String::with_capacity(content.len());
    for line in content.lines() {
        if removed.contains(&requirement_name(line)) {
            pruned = true;
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }
    if !pruned {
        return Ok(());
    }
    env.fs().write_file(&path, &kept)
}

struct List;

impl Command for List {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let toolchain = env.context.toolchain();
        env.out()
            .info(&format!("Using package manager: {toolchain}"));
        env.run(toolchain.list_argv(env.context.python()))
    }
}
