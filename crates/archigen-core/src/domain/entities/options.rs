use serde::Serialize;

use crate::domain::entities::{entity::DEFAULT_ID_TYPE, property::PropertyDefinition};

pub const DEFAULT_DB_CONTEXT: &str = "BaseDbContext";

/// Complete configuration of one CRUD generation run.
///
/// Built once from flags or config, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOptions {
    pub project_name: String,
    pub entity_name: String,
    pub db_context_name: String,
    pub id_type: String,
    pub properties: Vec<PropertyDefinition>,
    pub enable_security: bool,
}

impl GenerationOptions {
    pub fn new(project_name: impl Into<String>, entity_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            entity_name: entity_name.into(),
            db_context_name: DEFAULT_DB_CONTEXT.to_string(),
            id_type: DEFAULT_ID_TYPE.to_string(),
            properties: Vec::new(),
            enable_security: false,
        }
    }

    pub fn with_db_context(mut self, name: impl Into<String>) -> Self {
        self.db_context_name = name.into();
        self
    }

    pub fn with_id_type(mut self, id_type: impl Into<String>) -> Self {
        self.id_type = id_type.into();
        self
    }

    pub fn with_properties(mut self, properties: Vec<PropertyDefinition>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_security(mut self, enabled: bool) -> Self {
        self.enable_security = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = GenerationOptions::new("Shop", "Product");
        assert_eq!(opts.db_context_name, "BaseDbContext");
        assert_eq!(opts.id_type, "int");
        assert!(!opts.enable_security);
        assert!(opts.properties.is_empty());
    }
}
