pub mod entity;
pub mod layout;
pub mod options;
pub mod property;

pub use entity::{DEFAULT_ID_TYPE, EntityDefinition, INHERITED_MEMBERS};
pub use layout::ProjectLayout;
pub use options::{DEFAULT_DB_CONTEXT, GenerationOptions};
pub use property::{NULLABLE_MARKER, PropertyDefinition};
