//! Core domain layer for Fastman.
//!
//! Pure logic with no I/O: how argument tokens are classified, what a
//! command signature declares, how names are validated and cased, how
//! templates are rendered and which tool chain a set of marker files
//! implies. Everything that touches the outside world goes through the
//! ports in [`crate::application::ports`].

pub mod args;
pub mod error;
pub mod naming;
pub mod render;
pub mod scaffold_plan;
pub mod signature;
pub mod toolchain;

pub use args::{ArgumentVector, OptionStyle, ParseRules};
pub use error::{DomainError, ErrorCategory};
pub use render::RenderContext;
pub use scaffold_plan::{DirectoryToCreate, FileToWrite, PlanEntry, ScaffoldPlan, WriteMode};
pub use signature::{Parameter, Signature};
pub use toolchain::{Toolchain, ToolchainMarkers};
