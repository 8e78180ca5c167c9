//! Archigen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Archigen
//! CRUD scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           archigen-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (CrudService, PropertyService, ...)    │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │      (Driven: Filesystem, ToolRunner)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    archigen-adapters (Infrastructure)   │
//! │ (LocalFilesystem, ProcessToolRunner...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (EntityDefinition, parser, patcher,    │
//! │   artifact renderers) - no I/O          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use archigen_core::{
//!     application::{CrudService, ports::Filesystem},
//!     domain::{DomainValidator, GenerationOptions, ProjectLayout},
//! };
//!
//! # fn run(filesystem: Arc<dyn Filesystem>) -> archigen_core::error::ArchigenResult<()> {
//! let layout = ProjectLayout::new("./shop", "Shop")?;
//! let properties =
//!     DomainValidator::parse_properties("Name:string,Price:decimal", Some("Product"))?;
//! let options = GenerationOptions::new("Shop", "Product").with_properties(properties);
//!
//! let report = CrudService::new(filesystem).generate(&layout, &options)?;
//! println!("{} artifacts written", report.written());
//! # Ok(())
//! # }
//! ```

// Pure generation and patching logic
pub mod domain;

// Use cases over the ports
pub mod application;

// Error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CrudService, GenerationReport, PropertyService, ReportEntry, ReportStatus, ToolService,
        ports::{Filesystem, ToolCommand, ToolOutput, ToolRunner},
    };
    pub use crate::domain::{
        ArtifactKind, DomainValidator, EntityDefinition, EntityParser, GenerationOptions, Layer,
        ProjectLayout, PropertyDefinition,
    };
    pub use crate::error::{ArchigenError, ArchigenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
