//! Fastman Core - command dispatch for the Fastman CLI.
//!
//! This crate holds the domain and application layers of Fastman, following
//! a ports and adapters split:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          fastman-cli (binary)           │
//! │  startup, config, logging, commands     │
//! └──────────────────┬──────────────────────┘
//!                    │ registers + dispatches
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │           Application layer             │
//! │  Registry, Dispatcher, ScaffoldService  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Ports: Filesystem, ProcessRunner,     │
//! │          Reporter                       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   fastman-adapters / fastman-cli        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fastman_core::prelude::*;
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(CommandDescriptor::new("serve {--port=8000}", "Run", |args| {
//!     Box::new(Serve { args }) as Box<dyn Command>
//! })?);
//!
//! let outcome = Dispatcher::new(&registry, &context, &runtime).dispatch(&argv);
//! std::process::exit(outcome.exit_code().into());
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub mod prelude {
    pub use crate::application::{
        Command, CommandCategory, CommandDescriptor, CommandEnv, CommandRegistry, DispatchOutcome,
        Dispatcher, Interrupt, InvocationContext, Runtime, ScaffoldReport, ScaffoldService,
        ports::{Filesystem, ProcessOutcome, ProcessRunner, ProcessSpec, Reporter},
    };
    pub use crate::domain::{
        ArgumentVector, DomainError, OptionStyle, ParseRules, RenderContext, ScaffoldPlan,
        Signature, Toolchain, ToolchainMarkers,
    };
    pub use crate::error::{ErrorCategory, FastmanError, FastmanResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
