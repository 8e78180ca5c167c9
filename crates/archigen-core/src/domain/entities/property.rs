use serde::Serialize;
use std::fmt;

use crate::domain::{
    error::DomainError,
    naming::{lower_first, to_pascal_case},
};

/// Nullability marker appended to a declared type.
pub const NULLABLE_MARKER: char = '?';

/// A single typed member of an entity.
///
/// The name is stored in its PascalCase form; the field (camelCase) name is
/// derived from it so both always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PropertyDefinition {
    name: String,
    declared_type: String,
}

impl PropertyDefinition {
    /// Build from user input. The name is PascalCased and the type trimmed.
    ///
    /// Callers validate through [`crate::domain::DomainValidator`] first;
    /// this only rejects blank names.
    pub fn new(name: &str, declared_type: &str) -> Result<Self, DomainError> {
        Ok(Self {
            name: to_pascal_case(name)?,
            declared_type: declared_type.trim().to_string(),
        })
    }

    /// Build from a declaration recovered from source, keeping it verbatim.
    pub(crate) fn from_declaration(name: &str, declared_type: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// camelCase name used for constructor parameters and locals.
    pub fn field_name(&self) -> String {
        lower_first(&self.name)
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn is_nullable(&self) -> bool {
        self.declared_type.ends_with(NULLABLE_MARKER)
    }

    /// Declared type without the nullability marker.
    pub fn base_type(&self) -> &str {
        self.declared_type
            .strip_suffix(NULLABLE_MARKER)
            .unwrap_or(&self.declared_type)
    }

    pub fn is_text(&self) -> bool {
        self.base_type() == "string"
    }

    /// `public <Type> <Name> { get; set; }` at class-member indentation.
    pub fn declaration(&self) -> String {
        format!(
            "    public {} {} {{ get; set; }}",
            self.declared_type, self.name
        )
    }

    /// Default a parameterless constructor assigns, if any.
    ///
    /// Text members get `string.Empty` (nullable or not), other nullable
    /// members `null`, everything else keeps its language default.
    pub fn parameterless_initializer(&self) -> Option<&'static str> {
        if self.is_text() {
            Some("string.Empty")
        } else if self.is_nullable() {
            Some("null")
        } else {
            None
        }
    }
}

impl fmt::Display for PropertyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.declared_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names() {
        let prop = PropertyDefinition::new("unit-price", "decimal").unwrap();
        assert_eq!(prop.name(), "UnitPrice");
        assert_eq!(prop.field_name(), "unitPrice");
    }

    #[test]
    fn nullability() {
        let prop = PropertyDefinition::new("IsActive", "bool?").unwrap();
        assert!(prop.is_nullable());
        assert_eq!(prop.base_type(), "bool");
        assert_eq!(prop.parameterless_initializer(), Some("null"));
    }

    #[test]
    fn text_initializer_applies_to_nullable_text() {
        let name = PropertyDefinition::new("Name", "string").unwrap();
        let desc = PropertyDefinition::new("Description", "string?").unwrap();
        let price = PropertyDefinition::new("Price", "decimal").unwrap();
        assert_eq!(name.parameterless_initializer(), Some("string.Empty"));
        assert_eq!(desc.parameterless_initializer(), Some("string.Empty"));
        assert_eq!(price.parameterless_initializer(), None);
    }

    #[test]
    fn declaration_shape() {
        let prop = PropertyDefinition::new("Tags", "List<string>").unwrap();
        assert_eq!(prop.declaration(), "    public List<string> Tags { get; set; }");
    }
}
