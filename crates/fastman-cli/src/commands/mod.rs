//! Built-in commands and plugin registration.
//!
//! Every submodule exposes `descriptors()`, the commands it contributes to
//! the registry. Handlers are small structs holding their
//! [`ArgumentVector`]; all I/O goes through the [`CommandEnv`] ports.

use fastman_core::application::{Command, CommandDescriptor, CommandRegistry};
use fastman_core::domain::{ArgumentVector, DomainError};

pub mod completion;
pub mod database;
pub mod list;
pub mod package;
pub mod plugin;
pub mod project;
pub mod scaffold;
pub mod server;
pub mod utilities;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

type DescriptorGroup = fn() -> Result<Vec<CommandDescriptor>, DomainError>;

/// Wrap a handler constructor as a descriptor factory.
pub(crate) fn boxed<C, B>(
    build: B,
) -> impl Fn(ArgumentVector) -> Box<dyn Command> + Send + Sync + 'static
where
    C: Command + 'static,
    B: Fn(ArgumentVector) -> C + Send + Sync + 'static,
{
    move |args| Box::new(build(args)) as Box<dyn Command>
}

/// Register every built-in command.
pub fn register_builtin(registry: &mut CommandRegistry) -> Result<(), DomainError> {
    let groups: [DescriptorGroup; 9] = [
        list::descriptors,
        version::descriptors,
        project::descriptors,
        server::descriptors,
        scaffold::descriptors,
        database::descriptors,
        package::descriptors,
        utilities::descriptors,
        completion::descriptors,
    ];

    for group in groups {
        for descriptor in group()? {
            registry.register(descriptor);
        }
    }
    tracing::debug!(commands = registry.len(), "registered built-in commands");
    Ok(())
}

pub use plugin::register_plugins;
