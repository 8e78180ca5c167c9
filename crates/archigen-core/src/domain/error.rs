// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use std::fmt;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep them per artifact)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid name '{name}': {violation}")]
    InvalidName {
        name: String,
        violation: NameViolation,
        suggestion: Option<String>,
    },

    #[error(
        "Property type '{type_name}' is not valid. Use proper casing like: string, int, long, \
         decimal, double, float, bool, DateTime, DateOnly, TimeOnly, Guid. Add '?' for nullable \
         types (e.g., 'string?', 'int?')."
    )]
    InvalidType { type_name: String },

    #[error("Property type cannot be empty.")]
    EmptyType,

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    // ========================================================================
    // Conflict Errors
    // ========================================================================
    #[error("Entity '{name}' already exists")]
    DuplicateEntity { name: String },

    #[error("Property '{name}' is declared more than once")]
    DuplicateProperty { name: String },

    #[error("{file} already declares '{name}' as '{existing_type}', not '{requested_type}'")]
    PropertyConflict {
        file: String,
        name: String,
        existing_type: String,
        requested_type: String,
    },

    // ========================================================================
    // Source Shape Errors
    // ========================================================================
    #[error("Could not locate class definition in '{path}'")]
    ParseError { path: String },

    #[error("Marker '{marker}' not found in {file}")]
    MarkerNotFound { marker: String, file: String },

    #[error("Could not find a suitable insertion point in {file}")]
    NoInsertionPoint { file: String },
}

/// The single reason a name was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolation {
    Empty,
    IllegalIdentifier,
    ReservedKeyword,
    Denylisted,
    NotPascalCase,
    CollidesWithEntity,
}

impl NameViolation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "name cannot be empty",
            Self::IllegalIdentifier => {
                "must start with a letter or underscore and contain only letters, digits or underscores"
            }
            Self::ReservedKeyword => "is a reserved keyword",
            Self::Denylisted => "is too generic or shadows a built-in type name",
            Self::NotPascalCase => "must start with an uppercase letter",
            Self::CollidesWithEntity => "cannot be the same as the entity name",
        }
    }
}

impl fmt::Display for NameViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DomainError {
    pub(crate) fn invalid_name(name: &str, violation: NameViolation) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            violation,
            suggestion: None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName {
                suggestion: Some(s),
                ..
            } => vec![format!("Did you mean '{s}'?")],
            Self::InvalidName { violation, .. } => match violation {
                NameViolation::ReservedKeyword | NameViolation::Denylisted => vec![
                    "Use a descriptive, domain-specific name".into(),
                    "Examples: ProductName, OrderTotal, CustomerEmail".into(),
                ],
                NameViolation::CollidesWithEntity => {
                    vec!["Pick a name that describes the value, e.g. 'Title' or 'Code'".into()]
                }
                _ => vec!["Names must be PascalCase identifiers, e.g. 'OrderItem'".into()],
            },
            Self::InvalidType { .. } | Self::EmptyType => vec![
                "Primitives: string, int, long, decimal, double, float, bool".into(),
                "Dates and ids: DateTime, DateOnly, TimeOnly, Guid".into(),
                "Collections: List<T>, ICollection<T>, T[]".into(),
            ],
            Self::DuplicateEntity { name } => vec![
                format!("An entity file for '{name}' already exists"),
                "Run crud without --props to regenerate from the existing entity".into(),
            ],
            Self::PropertyConflict { name, .. } => vec![
                format!("Rename the new property or change '{name}' by hand"),
            ],
            Self::ParseError { path } => vec![
                format!("Check that {path} declares 'class <Name> : Entity<TId>'"),
            ],
            Self::MarkerNotFound { marker, .. } => vec![
                format!("Restore the '{marker}' line or apply the change manually"),
            ],
            Self::NoInsertionPoint { file } => vec![
                format!("Add the member to {file} manually"),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidName { .. }
            | Self::InvalidType { .. }
            | Self::EmptyType
            | Self::UnknownLayer(_)
            | Self::ParseError { .. } => ErrorCategory::Validation,
            Self::DuplicateEntity { .. }
            | Self::DuplicateProperty { .. }
            | Self::PropertyConflict { .. } => ErrorCategory::Conflict,
            Self::MarkerNotFound { .. } | Self::NoInsertionPoint { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_message_lists_examples() {
        let msg = DomainError::InvalidType {
            type_name: "sting".into(),
        }
        .to_string();
        assert!(msg.contains("'sting'"));
        assert!(msg.contains("DateTime"));
        assert!(msg.contains("string?"));
    }

    #[test]
    fn casing_suggestion_is_surfaced() {
        let err = DomainError::InvalidName {
            name: "name".into(),
            violation: NameViolation::NotPascalCase,
            suggestion: Some("Name".into()),
        };
        assert_eq!(err.suggestions(), vec!["Did you mean 'Name'?".to_string()]);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
