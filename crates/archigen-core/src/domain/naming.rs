//! Identifier case conversions and naive pluralization.
//!
//! Every generated identifier (class names, fields, folders, table names) is
//! derived from a single entity or property name through these functions, so
//! they must stay deterministic. Pluralization is a heuristic: irregular
//! nouns ("person", "child") are not special-cased.

use crate::domain::error::DomainError;

const SEPARATORS: [char; 4] = [' ', '-', '_', '.'];

/// Convert `input` to PascalCase.
///
/// Input without separators that already mixes upper and lower case is
/// returned unchanged, so `OrderItem` stays `OrderItem`.
pub fn to_pascal_case(input: &str) -> Result<String, DomainError> {
    if input.trim().is_empty() {
        return Err(DomainError::InvalidInput {
            message: "cannot convert an empty or whitespace-only value to PascalCase".into(),
        });
    }

    if !input.contains(SEPARATORS) {
        let has_upper = input.chars().any(char::is_uppercase);
        let has_lower = input.chars().any(char::is_lowercase);
        if has_upper && has_lower {
            return Ok(input.to_string());
        }
        return Ok(capitalize(input));
    }

    Ok(input
        .split(SEPARATORS)
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect())
}

/// Convert `input` to camelCase (PascalCase with a lowercase first letter).
pub fn to_camel_case(input: &str) -> Result<String, DomainError> {
    Ok(lower_first(&to_pascal_case(input)?))
}

/// Naive English plural.
///
/// `Category` → `Categories`, `Bus` → `Buses`, `User` → `Users`.
pub fn to_plural(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next_back() {
        None => String::new(),
        Some('y' | 'Y') if input.chars().count() > 1 => format!("{}ies", chars.as_str()),
        Some('s' | 'S') => format!("{input}es"),
        _ => format!("{input}s"),
    }
}

/// Lowercase only the first character.
pub fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Uppercase only the first character.
pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case_table() {
        assert_eq!(to_pascal_case("order-item").unwrap(), "OrderItem");
        assert_eq!(to_pascal_case("order_item").unwrap(), "OrderItem");
        assert_eq!(to_pascal_case("order item").unwrap(), "OrderItem");
        assert_eq!(to_pascal_case("product").unwrap(), "Product");
        assert_eq!(to_pascal_case("PRODUCT").unwrap(), "Product");
    }

    #[test]
    fn pascal_case_keeps_mixed_case_input() {
        assert_eq!(to_pascal_case("OrderItem").unwrap(), "OrderItem");
        assert_eq!(to_pascal_case("iPhone").unwrap(), "iPhone");
    }

    #[test]
    fn pascal_case_drops_empty_segments() {
        assert_eq!(to_pascal_case("--order__item..").unwrap(), "OrderItem");
    }

    #[test]
    fn pascal_case_rejects_blank() {
        assert!(matches!(
            to_pascal_case("   "),
            Err(DomainError::InvalidInput { .. })
        ));
        assert!(to_pascal_case("").is_err());
    }

    #[test]
    fn camel_case_table() {
        assert_eq!(to_camel_case("OrderItem").unwrap(), "orderItem");
        assert_eq!(to_camel_case("order-item").unwrap(), "orderItem");
        assert_eq!(to_camel_case("Name").unwrap(), "name");
    }

    #[test]
    fn plural_table() {
        assert_eq!(to_plural("Category"), "Categories");
        assert_eq!(to_plural("Bus"), "Buses");
        assert_eq!(to_plural("BUS"), "BUSes");
        assert_eq!(to_plural(""), "");
        assert_eq!(to_plural("User"), "Users");
        assert_eq!(to_plural("Y"), "Ys");
        // accepted limitation
        assert_eq!(to_plural("Person"), "Persons");
    }

    #[test]
    fn first_letter_helpers() {
        assert_eq!(lower_first("Products"), "products");
        assert_eq!(upper_first("name"), "Name");
        assert_eq!(lower_first(""), "");
    }
}
