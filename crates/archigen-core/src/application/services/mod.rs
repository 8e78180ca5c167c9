//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! high-level use cases: generate a CRUD slice, add a property, parse an
//! entity, and drive the external build tool.

pub mod artifact_writer;
pub mod crud_service;
pub mod entity_reader;
pub mod property_service;
pub mod report;
pub mod source_patcher;
pub mod tool_service;

#[cfg(test)]
pub(crate) mod fake_fs;

pub use artifact_writer::ArtifactWriter;
pub use crud_service::CrudService;
pub use entity_reader::EntityReader;
pub use property_service::PropertyService;
pub use report::{GenerationReport, ReportEntry, ReportStatus};
pub use source_patcher::SourcePatcher;
pub use tool_service::ToolService;
