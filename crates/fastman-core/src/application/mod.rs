//! Application layer for Fastman.
//!
//! This layer contains:
//! - **Commands**: the `Command` trait, descriptors and their environment
//! - **Registry / Dispatcher**: name lookup and exit-code mapping
//! - **Services**: scaffold plan application
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Business rules (argument classification, naming, rendering) live in
//! `crate::domain`.

pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod ports;
pub mod registry;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use command::{
    Command, CommandCategory, CommandDescriptor, CommandEnv, CommandFactory, CommandSummary,
    Runtime,
};
pub use context::{Interrupt, InvocationContext};
pub use dispatcher::{DispatchOutcome, Dispatcher, LIST_COMMAND, VERSION_COMMAND};
pub use error::ApplicationError;
pub use ports::{Filesystem, ProcessOutcome, ProcessRunner, ProcessSpec, Reporter};
pub use registry::CommandRegistry;
pub use services::{ScaffoldReport, ScaffoldService};
