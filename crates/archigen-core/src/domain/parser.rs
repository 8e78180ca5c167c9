//! Recovers an [`EntityDefinition`] from a generated entity source file.
//!
//! The accepted grammar is deliberately narrow:
//!
//! - `class <Name> : <Base>` where `<Base>` carries the identifier type as its
//!   first generic argument (`Entity<Guid>`); no argument means `int`.
//! - single-line auto-properties `public <Type> <Name> { get; set; }` where
//!   `<Type>` may contain `?`, `[]`, and generic arguments.
//!
//! Anything else in the file is ignored. Inherited base members are
//! filtered out and duplicate declarations are kept as they are.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{
    entities::{DEFAULT_ID_TYPE, EntityDefinition, INHERITED_MEMBERS, PropertyDefinition},
    error::DomainError,
};

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+(?<name>\w+)\s*:\s*(?<base>[^\r\n{]+)").expect("valid class regex")
});

static AUTO_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+(?<type>[\w?\[\]<>,\s]+)\s+(?<name>\w+)\s*\{\s*get;\s*set;\s*\}")
        .expect("valid property regex")
});

pub struct EntityParser;

impl EntityParser {
    /// Parse `source`; `path` only labels the error.
    pub fn parse(path: &str, source: &str) -> Result<EntityDefinition, DomainError> {
        let class = CLASS_DECLARATION
            .captures(source)
            .ok_or_else(|| DomainError::ParseError {
                path: path.to_string(),
            })?;

        let name = &class["name"];
        let id_type = Self::id_type(&class["base"]);

        let properties = AUTO_PROPERTY
            .captures_iter(source)
            .filter(|caps| !INHERITED_MEMBERS.contains(&&caps["name"]))
            .map(|caps| PropertyDefinition::from_declaration(&caps["name"], &caps["type"]))
            .collect();

        Ok(EntityDefinition::from_source(name, &id_type, properties))
    }

    /// `(name, type)` of the auto-property declared on `line`, if any.
    pub fn declared_member(line: &str) -> Option<(String, String)> {
        let caps = AUTO_PROPERTY.captures(line)?;
        Some((caps["name"].to_string(), caps["type"].trim().to_string()))
    }

    /// Text between the first `<` and the first `>` of the base clause.
    fn id_type(base: &str) -> String {
        match (base.find('<'), base.find('>')) {
            (Some(open), Some(close)) if close > open => base[open + 1..close].trim().to_string(),
            _ => DEFAULT_ID_TYPE.to_string(),
        }
    }
}
