//! Infrastructure adapters for Archigen.
//!
//! This crate implements the ports defined in `archigen-core::application::ports`
//! and owns the bulk template copy used by `archigen new`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod project_template;
pub mod tool_runner;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use project_template::{ProjectTemplate, TemplateInstance, TemplateSearch};
pub use tool_runner::{ProcessToolRunner, Stream};
