use serde::Serialize;
use std::collections::HashSet;

use crate::domain::{
    entities::property::PropertyDefinition,
    error::DomainError,
    naming::{lower_first, to_pascal_case, to_plural},
};

/// Identifier type used when none is given or found.
pub const DEFAULT_ID_TYPE: &str = "int";

/// Base-entity members supplied by the common `Entity<TId>` type.
pub const INHERITED_MEMBERS: [&str; 4] = ["Id", "CreatedDate", "UpdatedDate", "DeletedDate"];

/// Structural model of one entity: name, identifier type and ordered members.
///
/// The files on disk are the durable state; this is rebuilt on every run,
/// either from user input or by parsing the entity source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDefinition {
    name: String,
    id_type: String,
    properties: Vec<PropertyDefinition>,
}

impl EntityDefinition {
    /// Build from user input, rejecting repeated property names.
    pub fn new(
        name: &str,
        id_type: &str,
        properties: Vec<PropertyDefinition>,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for prop in &properties {
            if !seen.insert(prop.name().to_ascii_lowercase()) {
                return Err(DomainError::DuplicateProperty {
                    name: prop.name().to_string(),
                });
            }
        }

        Ok(Self {
            name: to_pascal_case(name)?,
            id_type: id_type.trim().to_string(),
            properties,
        })
    }

    /// Build from parsed source without re-deriving or deduplicating anything.
    pub(crate) fn from_source(
        name: &str,
        id_type: &str,
        properties: Vec<PropertyDefinition>,
    ) -> Self {
        Self {
            name: name.to_string(),
            id_type: id_type.to_string(),
            properties,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn field_name(&self) -> String {
        lower_first(&self.name)
    }

    pub fn plural_name(&self) -> String {
        to_plural(&self.name)
    }

    /// Plural in camelCase, e.g. `orderItems`.
    pub fn plural_field_name(&self) -> String {
        lower_first(&self.plural_name())
    }

    /// Lambda parameter used in generated mapping code, e.g. `product`.
    pub fn lambda_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .iter()
            .any(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn text_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().filter(|p| p.is_text())
    }

    /// Constructor parameter list, e.g. `string name, decimal price`.
    pub fn parameter_list(&self) -> String {
        self.properties
            .iter()
            .map(|p| format!("{} {}", p.declared_type(), p.field_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
