//! Application services (use case orchestration).

pub mod scaffold_service;

pub use scaffold_service::{ScaffoldReport, ScaffoldService};
