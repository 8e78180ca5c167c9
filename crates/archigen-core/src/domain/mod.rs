// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Archigen.
//!
//! Pure generation and patching logic. Nothing here touches the filesystem
//! or spawns processes; text goes in and text (or a typed error) comes out.
//! The application layer reads and writes files through its ports.
//!
//! ## Layout
//!
//! - **Model**: [`EntityDefinition`], [`PropertyDefinition`],
//!   [`ProjectLayout`], [`GenerationOptions`]
//! - **Rules**: [`naming`], [`DomainValidator`]
//! - **Reading source**: [`EntityParser`]
//! - **Editing source**: [`SourceFile`], [`patcher`], [`class_body`]
//! - **Writing source**: [`artifacts`]
//!
// Public API - what the world sees
pub mod artifacts;
pub mod class_body;
pub mod entities;
pub mod error;
pub mod naming;
pub mod patcher;
pub mod value_objects;

mod parser;
mod source;
mod validation;

pub use entities::{
    DEFAULT_DB_CONTEXT, DEFAULT_ID_TYPE, EntityDefinition, GenerationOptions, INHERITED_MEMBERS,
    ProjectLayout, PropertyDefinition,
};
pub use error::{DomainError, ErrorCategory, NameViolation};
pub use parser::EntityParser;
pub use source::{PatchOutcome, SourceFile};
pub use validation::{DomainValidator, NameContext, PRIMITIVE_TYPES};
pub use value_objects::{ArtifactKind, Layer};
