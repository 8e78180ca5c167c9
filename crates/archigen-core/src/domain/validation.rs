use crate::domain::{
    entities::PropertyDefinition,
    error::{DomainError, NameViolation},
    naming::upper_first,
};

/// What a name is being validated as.
#[derive(Debug, Clone, Copy)]
pub enum NameContext<'a> {
    /// A member of `entity` (when known).
    Property { entity: Option<&'a str> },
    /// A new entity next to the `existing` ones.
    Entity { existing: &'a [String] },
}

const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const PROPERTY_DENYLIST: &[&str] = &[
    "string", "int", "bool", "double", "float", "decimal", "long", "short", "byte", "char",
    "object", "id", "entity", "model", "class", "type", "value", "data", "property", "field",
    "variable",
];

const ENTITY_DENYLIST: &[&str] = &[
    "String", "Int", "Bool", "Double", "Float", "Decimal", "Long", "Short", "Byte", "Char",
    "Object", "DateTime", "Guid", "List", "Array", "Dictionary", "Collection", "Entity",
    "Model", "Class", "Type", "Data", "Item", "Record", "Row", "Table", "Database",
    "Repository", "Service", "Controller", "Manager", "Handler",
];

/// Canonically cased primitive types.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string", "int", "long", "decimal", "double", "float", "bool", "DateTime", "DateOnly",
    "TimeOnly", "Guid", "byte", "short", "char", "object",
];

const GENERIC_COLLECTIONS: &[&str] = &[
    "List", "IList", "ICollection", "IEnumerable", "HashSet", "ISet", "Dictionary",
    "IDictionary", "KeyValuePair",
];

const GENERIC_PREFIXES: &[(&str, &str)] = &[
    ("list<", "List<"),
    ("ilist<", "IList<"),
    ("icollection<", "ICollection<"),
    ("ienumerable<", "IEnumerable<"),
    ("dictionary<", "Dictionary<"),
    ("idictionary<", "IDictionary<"),
];

/// Centralized name and type validation.
///
/// Every check fails with exactly one documented reason; nothing here panics.
pub struct DomainValidator;

impl DomainValidator {
    /// Validate `name` in `context`.
    ///
    /// Checks run from the most specific reason to the least: empty, illegal
    /// identifier, reserved keyword, denylist, casing, then collisions.
    pub fn validate_name(name: &str, context: NameContext<'_>) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::invalid_name(name, NameViolation::Empty));
        }
        if !Self::is_valid_identifier(name) {
            return Err(DomainError::invalid_name(name, NameViolation::IllegalIdentifier));
        }
        if Self::is_reserved_keyword(name) {
            return Err(DomainError::invalid_name(name, NameViolation::ReservedKeyword));
        }

        let denylisted = match context {
            NameContext::Property { .. } => contains_ignore_case(PROPERTY_DENYLIST, name),
            NameContext::Entity { .. } => contains_ignore_case(ENTITY_DENYLIST, name),
        };
        if denylisted {
            return Err(DomainError::invalid_name(name, NameViolation::Denylisted));
        }

        if !name.starts_with(|c: char| c.is_uppercase()) {
            return Err(DomainError::InvalidName {
                name: name.to_string(),
                violation: NameViolation::NotPascalCase,
                suggestion: Some(upper_first(name)),
            });
        }

        match context {
            NameContext::Property {
                entity: Some(entity),
            } if name.eq_ignore_ascii_case(entity) => Err(DomainError::invalid_name(
                name,
                NameViolation::CollidesWithEntity,
            )),
            NameContext::Entity { existing }
                if existing.iter().any(|e| e.eq_ignore_ascii_case(name)) =>
            {
                Err(DomainError::DuplicateEntity {
                    name: name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn validate_property_name(name: &str, entity: Option<&str>) -> Result<(), DomainError> {
        Self::validate_name(name, NameContext::Property { entity })
    }

    pub fn validate_entity_name(name: &str, existing: &[String]) -> Result<(), DomainError> {
        Self::validate_name(name, NameContext::Entity { existing })
    }

    /// Normalize common aliases to canonical casing and validate the result.
    ///
    /// Returns the normalized type.
    pub fn validate_type(declared_type: &str) -> Result<String, DomainError> {
        let trimmed = declared_type.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyType);
        }

        let normalized = Self::normalize_type(trimmed);
        let base = normalized.strip_suffix('?').unwrap_or(&normalized);
        if Self::is_valid_type(base) {
            Ok(normalized)
        } else {
            Err(DomainError::InvalidType {
                type_name: declared_type.to_string(),
            })
        }
    }

    /// Map an alias like `Int32` or `system.string` to its canonical form.
    ///
    /// Unknown names pass through unchanged so custom types survive.
    pub fn normalize_type(declared_type: &str) -> String {
        let (base, nullable) = match declared_type.strip_suffix('?') {
            Some(base) => (base, "?"),
            None => (declared_type, ""),
        };
        let lower = base.to_ascii_lowercase();

        let canonical = match lower.as_str() {
            "string" | "system.string" => Some("string"),
            "int" | "int32" | "system.int32" => Some("int"),
            "long" | "int64" => Some("long"),
            "bool" | "boolean" => Some("bool"),
            "double" => Some("double"),
            "float" => Some("float"),
            "decimal" => Some("decimal"),
            "datetime" => Some("DateTime"),
            "dateonly" => Some("DateOnly"),
            "timeonly" => Some("TimeOnly"),
            "guid" => Some("Guid"),
            "byte" => Some("byte"),
            "short" | "int16" => Some("short"),
            "char" => Some("char"),
            "object" => Some("object"),
            _ => None,
        };
        if let Some(canonical) = canonical {
            return format!("{canonical}{nullable}");
        }

        for (alias, proper) in GENERIC_PREFIXES {
            if lower.starts_with(alias) {
                return format!("{proper}{}{nullable}", &base[alias.len()..]);
            }
        }

        declared_type.to_string()
    }

    /// Accepts primitives, arrays of valid types, known generic collections
    /// and PascalCase custom types. `declared_type` must already be stripped of
    /// its nullability marker.
    pub fn is_valid_type(declared_type: &str) -> bool {
        if PRIMITIVE_TYPES.contains(&declared_type) {
            return true;
        }
        if let Some(element) = declared_type.strip_suffix("[]") {
            return Self::is_valid_type(element);
        }
        if declared_type.contains('<') && declared_type.ends_with('>') {
            return GENERIC_COLLECTIONS
                .iter()
                .any(|g| declared_type.starts_with(&format!("{g}<")));
        }

        declared_type.starts_with(|c: char| c.is_ascii_uppercase())
            && declared_type.chars().all(|c| c.is_alphanumeric() || c == '_')
    }

    /// First char letter or underscore; the rest letters, digits or underscores.
    pub fn is_valid_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }

    pub fn is_reserved_keyword(name: &str) -> bool {
        contains_ignore_case(RESERVED_KEYWORDS, name)
    }

    /// Parse `"Name:string,Description:string?"` into validated properties.
    ///
    /// Entries are split on `,` and `:`, trimmed, empties dropped. A missing
    /// type means `string`.
    pub fn parse_properties(
        spec: &str,
        entity: Option<&str>,
    ) -> Result<Vec<PropertyDefinition>, DomainError> {
        let mut properties: Vec<PropertyDefinition> = Vec::new();

        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, declared_type) = match entry.split_once(':') {
                Some((name, ty)) => (name.trim(), ty.trim()),
                None => (entry, "string"),
            };
            let property = Self::validate_property(name, declared_type, entity)?;

            if properties
                .iter()
                .any(|p| p.name().eq_ignore_ascii_case(property.name()))
            {
                return Err(DomainError::DuplicateProperty {
                    name: property.name().to_string(),
                });
            }
            properties.push(property);
        }

        Ok(properties)
    }

    /// Validate a name/type pair and build the property from it.
    pub fn validate_property(
        name: &str,
        declared_type: &str,
        entity: Option<&str>,
    ) -> Result<PropertyDefinition, DomainError> {
        Self::validate_property_name(name, entity)?;
        let normalized = Self::validate_type(declared_type)?;
        PropertyDefinition::new(name, &normalized)
    }
}

fn contains_ignore_case(list: &[&str], name: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(result: Result<(), DomainError>) -> NameViolation {
        match result {
            Err(DomainError::InvalidName { violation, .. }) => violation,
            other => panic!("expected InvalidName, got {other:?}"),
        }
    }

    fn property(name: &str) -> Result<(), DomainError> {
        DomainValidator::validate_property_name(name, Some("Product"))
    }

    #[test]
    fn rejected_property_names() {
        assert_eq!(violation(property("id")), NameViolation::Denylisted);
        assert_eq!(violation(property("class")), NameViolation::ReservedKeyword);
        assert_eq!(violation(property("")), NameViolation::Empty);
        assert_eq!(violation(property("1Name")), NameViolation::IllegalIdentifier);
        assert_eq!(violation(property("Unit-Price")), NameViolation::IllegalIdentifier);
        assert_eq!(violation(property("product")), NameViolation::NotPascalCase);
        assert_eq!(violation(property("Product")), NameViolation::CollidesWithEntity);
    }

    #[test]
    fn casing_error_suggests_fix() {
        let err = property("name").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidName { suggestion: Some(ref s), .. } if s == "Name"
        ));
    }

    #[test]
    fn accepted_property_names() {
        assert!(property("Name").is_ok());
        assert!(property("_Legacy").is_err()); // not PascalCase
        assert!(property("UnitPrice2").is_ok());
    }

    #[test]
    fn entity_names() {
        let existing = vec!["Product".to_string()];
        assert!(matches!(
            DomainValidator::validate_entity_name("PRODUCT", &existing),
            Err(DomainError::DuplicateEntity { .. })
        ));
        assert_eq!(
            violation(DomainValidator::validate_entity_name("Repository", &existing)),
            NameViolation::Denylisted
        );
        assert!(DomainValidator::validate_entity_name("Order", &existing).is_ok());
    }

    #[test]
    fn name_validation_is_total() {
        let samples = [
            "", " ", "a", "A", "_", "9", "ÄÖ", "with space", "Ünïcode", "x-y", "Id", "ID",
            "\u{200b}", "String", "Ok", "Null", "null",
        ];
        for sample in samples {
            match property(sample) {
                Ok(()) | Err(DomainError::InvalidName { .. }) => {}
                other => panic!("unexpected outcome for {sample:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn type_normalization() {
        assert_eq!(DomainValidator::normalize_type("Int32"), "int");
        assert_eq!(DomainValidator::normalize_type("system.string"), "string");
        assert_eq!(DomainValidator::normalize_type("datetime?"), "DateTime?");
        assert_eq!(DomainValidator::normalize_type("boolean"), "bool");
        assert_eq!(DomainValidator::normalize_type("list<string>"), "List<string>");
        assert_eq!(DomainValidator::normalize_type("Money"), "Money");
    }

    #[test]
    fn type_validation() {
        assert_eq!(DomainValidator::validate_type("string?").unwrap(), "string?");
        assert_eq!(DomainValidator::validate_type("GUID").unwrap(), "Guid");
        assert!(DomainValidator::validate_type("int[]").is_ok());
        assert!(DomainValidator::validate_type("ICollection<OrderLine>").is_ok());
        assert!(DomainValidator::validate_type("Money").is_ok());
        assert!(DomainValidator::validate_type("Stack<int>").is_err());
        assert!(matches!(
            DomainValidator::validate_type(" "),
            Err(DomainError::EmptyType)
        ));
    }

    #[test]
    fn misspelled_type_lists_examples() {
        let err = DomainValidator::validate_type("sting").unwrap_err();
        assert!(matches!(err, DomainError::InvalidType { .. }));
        let msg = err.to_string();
        for example in ["string", "int", "decimal", "bool", "DateTime", "Guid"] {
            assert!(msg.contains(example), "missing {example} in {msg}");
        }
    }

    #[test]
    fn parse_property_list() {
        let props = DomainValidator::parse_properties(
            "Name:string, Price:Decimal,, IsActive:bool? ,Sku",
            Some("Product"),
        )
        .unwrap();
        let rendered: Vec<String> = props.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["Name: string", "Price: decimal", "IsActive: bool?", "Sku: string"]
        );
    }

    #[test]
    fn parse_property_list_rejects_bad_entries() {
        assert!(DomainValidator::parse_properties("Name:sting", None).is_err());
        assert!(DomainValidator::parse_properties("Name:string,Name:int", None).is_err());
        assert!(DomainValidator::parse_properties("Product:string", Some("Product")).is_err());
    }
}
