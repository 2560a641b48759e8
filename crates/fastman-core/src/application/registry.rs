//! Command registry.
//!
//! Built once at start-up by an explicit registration step, then passed by
//! reference to the dispatcher. Nothing mutates it after dispatch begins.

use std::collections::HashMap;

use super::command::CommandDescriptor;

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name.
    ///
    /// Registering a name twice replaces the earlier descriptor. Returns the
    /// replaced one, if any.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Option<CommandDescriptor> {
        let name = descriptor.name().to_string();
        let previous = self.commands.insert(name, descriptor);
        if let Some(prev) = &previous {
            tracing::debug!(command = prev.name(), "replaced registered command");
        }
        previous
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All descriptors, sorted by name.
    pub fn list_all(&self) -> Vec<&CommandDescriptor> {
        let mut all: Vec<_> = self.commands.values().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Sorted command names.
    pub fn names(&self) -> Vec<&str> {
        self.list_all().into_iter().map(CommandDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command::{Command, CommandEnv};
    use crate::domain::ArgumentVector;
    use crate::error::FastmanResult;

    struct Noop;

    impl Command for Noop {
        fn execute(&self, _env: &CommandEnv<'_>) -> FastmanResult<()> {
            Ok(())
        }
    }

    fn descriptor(signature: &str, description: &str) -> CommandDescriptor {
        CommandDescriptor::new(signature, description, |_: ArgumentVector| {
            Box::new(Noop) as Box<dyn Command>
        })
        .unwrap()
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(descriptor("make:model {name}", "first")).is_none());
        let replaced = registry.register(descriptor("make:model {name} {--table=}", "second"));

        assert_eq!(replaced.map(|d| d.description().to_string()).as_deref(), Some("first"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("make:model").unwrap().description(), "second");
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor("serve", "Run"));

        assert!(registry.lookup("serve").is_some());
        assert!(registry.lookup("Serve").is_none());
        assert!(registry.lookup("ser").is_none());
        assert!(registry.lookup("serve ").is_none());
    }

    #[test]
    fn list_all_is_sorted() {
        let mut registry = CommandRegistry::new();
        for sig in ["serve", "make:model {name}", "cache:clear", "new {name}"] {
            registry.register(descriptor(sig, "x"));
        }
        assert_eq!(
            registry.names(),
            ["cache:clear", "make:model", "new", "serve"]
        );
        assert!(!registry.is_empty());
    }
}
