//! Infrastructure adapters for Fastman.
//!
//! This crate implements the ports defined in
//! `fastman-core::application::ports` and everything else that has to look
//! at the real machine: marker files, `PATH`, plugin manifests.

pub mod filesystem;
pub mod plugins;
pub mod process;
pub mod toolchain;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use plugins::{PluginLoader, PluginManifest};
pub use process::SystemProcessRunner;
pub use toolchain::{detect_markers, detect_toolchain, find_python};
