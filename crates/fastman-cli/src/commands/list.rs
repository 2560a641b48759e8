//! Implementation of the `fastman list` command.

use fastman_core::application::{Command, CommandCategory, CommandDescriptor, CommandEnv};
use fastman_core::domain::{ArgumentVector, DomainError};
use fastman_core::error::{Context as _, FastmanResult};

use super::boxed;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![CommandDescriptor::new(
        "list {--format=table}",
        "List all available commands",
        boxed(List),
    )?])
}

struct List(ArgumentVector);

impl Command for List {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        match self.0.option_or("format", "table") {
            "table" => {
                print_table(env);
                Ok(())
            }
            "json" => print_json(env),
            other => Err(DomainError::InvalidOption {
                option: "format".into(),
                value: other.into(),
                reason: "expected 'table' or 'json'".into(),
            }
            .into()),
        }
    }
}

fn print_table(env: &CommandEnv<'_>) {
    let out = env.out();
    let commands = env.registry.list_all();
    let width = commands.iter().map(|d| d.name().len()).max().unwrap_or(0);

    out.header(&format!("Fastman v{}", fastman_core::VERSION));
    out.line("");
    out.header("Usage:");
    out.line("  fastman <command> [arguments] [--option=value]");
    out.line("");
    out.header("Options:");
    out.line(&format!("  {:<w$}  Show this listing", "-h, --help", w = width));
    out.line(&format!("  {:<w$}  Show the Fastman version", "-v, --version", w = width));
    out.line("");
    out.header("Available commands:");

    for category in CommandCategory::ALL {
        let members: Vec<_> = commands
            .iter()
            .filter(|d| d.category() == category)
            .collect();
        if members.is_empty() {
            continue;
        }

        out.header(&format!(" {}", category.title()));
        for descriptor in members {
            out.line(&format!(
                "  {:<w$}  {}",
                descriptor.name(),
                descriptor.description(),
                w = width
            ));
        }
        out.line("");
    }
}

fn print_json(env: &CommandEnv<'_>) -> FastmanResult<()> {
    let summaries: Vec<_> = env
        .registry
        .list_all()
        .into_iter()
        .map(CommandDescriptor::summary)
        .collect();
    let json = serde_json::to_string_pretty(&summaries).context("serialising command list")?;
    env.out().line(&json);
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::test_support::Harness;

    #[test]
    fn groups_commands_by_category_in_display_order() {
        let h = Harness::new();
        assert_eq!(h.run(&["list"]).exit_code(), 0);

        let lines = h.reporter.lines();
        let pos = |needle: &str| lines.iter().position(|l| l == needle).unwrap();

        assert!(lines[0].starts_with("header: Fastman v"));
        assert!(pos("header:  Project Setup") < pos("header:  Development"));
        assert!(pos("header:  Scaffolding") < pos("header:  Database"));
        assert!(pos("header:  Cache") < pos("header:  Utilities"));
        assert!(h.reporter.contains("make:feature"));
    }

    #[test]
    fn names_are_aligned() {
        let h = Harness::new();
        h.run(&["list"]);

        let lines = h.reporter.lines();
        let column = |name: &str| {
            let line = lines
                .iter()
                .find(|l| l.starts_with(&format!("line:   {name} ")))
                .unwrap();
            line.len() - line[line.find(name).unwrap() + name.len()..].trim_start().len()
        };
        assert_eq!(column("serve"), column("make:migration"));
    }

    #[test]
    fn empty_argv_and_help_show_the_listing() {
        for argv in [&[][..], &["-h"], &["--help"]] {
            let h = Harness::new();
            assert_eq!(h.run(argv).exit_code(), 0);
            assert!(h.reporter.contains("Available commands:"));
        }
    }

    #[test]
    fn json_format_lists_every_command() {
        let h = Harness::new();
        assert_eq!(h.run(&["list", "--format=json"]).exit_code(), 0);

        let lines = h.reporter.lines();
        let json = lines[0].strip_prefix("line: ").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), h.registry.len());
        assert!(entries.iter().any(|e| e["name"] == "make:feature"
            && e["category"] == "Scaffolding"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let h = Harness::new();
        assert_eq!(h.run(&["list", "--format=xml"]).exit_code(), 1);
        assert!(h.reporter.contains("Invalid value 'xml' for --format"));
    }
}
