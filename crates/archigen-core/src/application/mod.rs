//! Application layer for Archigen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (CrudService, PropertyService, ToolService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation or patching rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArtifactWriter, CrudService, EntityReader, GenerationReport, PropertyService, ReportEntry,
    ReportStatus, SourcePatcher, ToolService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{DirEntry, Filesystem, ToolCommand, ToolOutput, ToolRunner};

pub use error::ApplicationError;
