//! Shell completion generation.
//!
//! The clap command tree is built from the registry at run time, so plugin
//! commands complete like built-ins. `--install` writes the script where
//! the shell looks for it and, for bash, sources it from `~/.bashrc`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction};
use clap_complete::{Shell, generate};
use fastman_core::application::{Command, CommandDescriptor, CommandEnv, CommandRegistry};
use fastman_core::domain::{ArgumentVector, DomainError, Parameter};
use fastman_core::error::FastmanResult;

use super::boxed;

const BIN_NAME: &str = "fastman";
const SUPPORTED: &str = "bash, zsh, fish, powershell, elvish";

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![CommandDescriptor::new(
        "completion {shell} {--install}",
        "Generate shell completion script (bash, zsh, fish, powershell)",
        boxed(Completion),
    )?])
}

fn parse_shell(name: &str) -> Result<Shell, DomainError> {
    match name.to_ascii_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "ps" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        _ => Err(DomainError::Precondition {
            message: format!("Unknown shell: {name}"),
            hint: Some(format!("Supported shells: {SUPPORTED}")),
        }),
    }
}

/// clap command tree mirroring the registry.
pub(crate) fn command_tree(registry: &CommandRegistry) -> clap::Command {
    let mut root = clap::Command::new(BIN_NAME)
        .version(fastman_core::VERSION)
        .disable_help_subcommand(true);

    for descriptor in registry.list_all() {
        let mut sub = clap::Command::new(descriptor.name().to_string())
            .about(descriptor.description().to_string())
            .disable_help_flag(true);

        let mut seen = HashSet::new();
        for parameter in descriptor.signature().parameters() {
            if !seen.insert(parameter.name()) {
                continue;
            }
            sub = sub.arg(match parameter {
                Parameter::Positional { name } => Arg::new(name.clone()),
                Parameter::Option { name, .. } => Arg::new(name.clone())
                    .long(name.clone())
                    .num_args(1)
                    .require_equals(true),
                Parameter::Flag { name } => Arg::new(name.clone())
                    .long(name.clone())
                    .action(ArgAction::SetTrue),
            });
        }
        root = root.subcommand(sub);
    }
    root
}

/// Where `--install` puts a completion script.
#[derive(Debug, PartialEq, Eq)]
struct InstallTarget {
    script: PathBuf,
    /// Profile file and the line that loads the script from it.
    profile: Option<(PathBuf, String)>,
    /// Shown after installing.
    reload: String,
}

const PROFILE_MARKER: &str = "# Fastman CLI completion";

fn install_target(shell: Shell, home: &Path) -> Result<InstallTarget, DomainError> {
    let target = match shell {
        Shell::Bash => {
            let script = home.join(".fastman-completion.bash");
            let source = format!("source {}", script.display());
            InstallTarget {
                script,
                profile: Some((home.join(".bashrc"), source)),
                reload: "source ~/.bashrc".into(),
            }
        }
        // Picked up through fpath.
        Shell::Zsh => InstallTarget {
            script: home.join(".zsh/completions/_fastman"),
            profile: None,
            reload: "source ~/.zshrc".into(),
        },
        Shell::Fish => InstallTarget {
            script: home.join(".config/fish/completions/fastman.fish"),
            profile: None,
            reload: "source ~/.config/fish/completions/fastman.fish".into(),
        },
        Shell::PowerShell => {
            let script = home.join("fastman-completion.ps1");
            let reload = format!(". {}", script.display());
            InstallTarget {
                script,
                profile: None,
                reload,
            }
        }
        other => {
            return Err(DomainError::Precondition {
                message: format!("Installation not supported for {other}"),
                hint: Some(format!("Print the script with 'fastman completion {other}' and source it manually")),
            });
        }
    };
    Ok(target)
}

fn home_dir() -> Result<PathBuf, DomainError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| DomainError::Precondition {
            message: "Cannot determine the home directory".into(),
            hint: Some("Set HOME and try again".into()),
        })
}

fn install(env: &CommandEnv<'_>, target: &InstallTarget, script: &str) -> FastmanResult<()> {
    let fs = env.fs();
    let out = env.out();

    if let Some(parent) = target.script.parent() {
        fs.create_dir_all(parent)?;
    }
    fs.write_file(&target.script, script)?;
    out.success(&format!("Completion script installed to: {}", target.script.display()));

    if let Some((profile, line)) = &target.profile {
        if !fs.exists(profile) {
            fs.write_file(profile, &format!("{PROFILE_MARKER}\n{line}\n"))?;
            out.success(&format!("Created {}", profile.display()));
        } else {
            let mut content = fs.read_to_string(profile)?;
            if !content.lines().any(|l| l.trim() == line) {
                if !content.is_empty() && !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push_str(&format!("\n{PROFILE_MARKER}\n{line}\n"));
                fs.write_file(profile, &content)?;
                out.success(&format!("Updated {}", profile.display()));
            }
        }
    }

    out.line("");
    out.info("Please restart your shell or run:");
    out.line(&format!("  {}", target.reload));
    Ok(())
}

struct Completion(ArgumentVector);

impl Command for Completion {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let shell = parse_shell(self.0.positional_or(0, "bash"))?;
        let target = if self.0.flag("install") {
            Some(install_target(shell, &home_dir()?)?)
        } else {
            None
        };

        let mut tree = command_tree(env.registry);
        let mut buffer = Vec::new();
        generate(shell, &mut tree, BIN_NAME, &mut buffer);
        let script = String::from_utf8_lossy(&buffer);

        match target {
            Some(target) => install(env, &target, &script),
            None => {
                env.out().line(script.trim_end_matches('\n'));
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;
    use super::*;

    #[test]
    fn tree_is_consistent() {
        let h = Harness::new();
        let tree = command_tree(&h.registry);
        tree.clone().debug_assert();
        assert!(tree.find_subcommand("make:feature").is_some());
        assert_eq!(tree.get_subcommands().count(), h.registry.len());
    }

    #[test]
    fn shells_and_aliases() {
        assert_eq!(parse_shell("PS").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("zsh").unwrap(), Shell::Zsh);
        let err = parse_shell("tcsh").unwrap_err();
        assert_eq!(err.to_string(), "Unknown shell: tcsh");
        assert_eq!(err.suggestions(), [format!("Supported shells: {SUPPORTED}")]);
    }

    #[test]
    fn bash_is_the_default() {
        let h = Harness::new();
        assert_eq!(h.run(&["completion"]).exit_code(), 0);
        assert!(h.reporter.contains("_fastman()"));
        assert!(h.reporter.contains("make:feature"));
    }

    #[test]
    fn install_targets_per_shell() {
        let home = Path::new("/home/dev");
        let bash = install_target(Shell::Bash, home).unwrap();
        assert_eq!(bash.script, home.join(".fastman-completion.bash"));
        assert_eq!(
            bash.profile,
            Some((home.join(".bashrc"), String::from("source /home/dev/.fastman-completion.bash")))
        );

        let zsh = install_target(Shell::Zsh, home).unwrap();
        assert_eq!(zsh.script, home.join(".zsh/completions/_fastman"));
        assert!(zsh.profile.is_none());

        let ps = install_target(Shell::PowerShell, home).unwrap();
        assert_eq!(ps.reload, ". /home/dev/fastman-completion.ps1");

        assert!(install_target(Shell::Elvish, home).is_err());
    }

    #[test]
    fn install_writes_script_and_sources_it_once() {
        let home = home_dir().unwrap();
        let h = Harness::new();
        h.fs.insert_file(home.join(".bashrc"), "alias ll='ls -l'");

        assert_eq!(h.run(&["completion", "bash", "--install"]).exit_code(), 0);
        assert_eq!(h.run(&["completion", "bash", "--install"]).exit_code(), 0);

        let script = h.fs.read_file(home.join(".fastman-completion.bash")).unwrap();
        assert!(script.contains("_fastman()"));
        let bashrc = h.fs.read_file(home.join(".bashrc")).unwrap();
        let source = format!("source {}", home.join(".fastman-completion.bash").display());
        assert!(bashrc.starts_with("alias ll='ls -l'\n\n# Fastman CLI completion\n"));
        assert_eq!(bashrc.matches(source.as_str()).count(), 1);
        assert!(h.reporter.contains("Completion script installed to:"));
        assert!(!h.reporter.contains("line: _fastman()"));
    }

    #[test]
    fn install_creates_missing_profile() {
        let home = home_dir().unwrap();
        let h = Harness::new();
        assert_eq!(h.run(&["completion", "fish", "--install"]).exit_code(), 0);
        assert!(
            h.fs.read_file(home.join(".config/fish/completions/fastman.fish"))
                .is_some()
        );

        let h = Harness::new();
        assert_eq!(h.run(&["completion", "bash", "--install"]).exit_code(), 0);
        let bashrc = h.fs.read_file(home.join(".bashrc")).unwrap();
        assert!(bashrc.starts_with("# Fastman CLI completion\nsource "));
    }

    #[test]
    fn unknown_shell_fails() {
        let h = Harness::new();
        assert_eq!(h.run(&["completion", "nushell"]).exit_code(), 1);
        assert!(h.reporter.contains("Supported shells:"));
    }
}
