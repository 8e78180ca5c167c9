//! Line-scan heuristics for editing class bodies without a real parser.
//!
//! Supported shapes are the ones the generator itself emits: single-line
//! auto-properties, constructors whose signature fits on one line with the
//! body braces on their own lines, and nested `...Handler : IRequestHandler`
//! classes that must never be touched.

use crate::domain::{
    entities::PropertyDefinition,
    error::DomainError,
    parser::EntityParser,
    source::{PatchOutcome, SourceFile},
};

const MEMBER_INDENT: &str = "    ";

// ── Insertion point ──────────────────────────────────────────────────────────

/// Where a new member declaration goes.
///
/// Priority: right after the last auto-property, else right before the first
/// constructor, else right before the first method.
pub fn find_insertion_point(lines: &[String]) -> Option<usize> {
    if let Some(last) = lines.iter().rposition(|l| is_auto_property(l)) {
        return Some(last + 1);
    }
    if let Some(ctor) = lines.iter().position(|l| constructor_parameters(l).is_some()) {
        return Some(ctor);
    }
    lines.iter().position(|l| is_method(l))
}

/// Declared type of `name` if the file already has that auto-property.
pub fn find_property(lines: &[String], name: &str) -> Option<String> {
    lines.iter().find_map(|line| {
        EntityParser::declared_member(line)
            .filter(|(member, _)| member == name)
            .map(|(_, declared_type)| declared_type)
    })
}

/// Insert `prop` as an auto-property.
///
/// Same name and type already declared: `AlreadyPresent`. Same name with a
/// different type: `PropertyConflict`.
pub fn add_property(
    src: &mut SourceFile,
    prop: &PropertyDefinition,
) -> Result<PatchOutcome, DomainError> {
    if let Some(existing_type) = find_property(src.lines(), prop.name()) {
        if existing_type == prop.declared_type() {
            return Ok(PatchOutcome::AlreadyPresent);
        }
        return Err(DomainError::PropertyConflict {
            file: src.display_name(),
            name: prop.name().to_string(),
            existing_type,
            requested_type: prop.declared_type().to_string(),
        });
    }

    let index =
        find_insertion_point(src.lines()).ok_or_else(|| DomainError::NoInsertionPoint {
            file: src.display_name(),
        })?;
    src.insert_lines(index, &[prop.declaration()]);
    Ok(PatchOutcome::Applied)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Extend every constructor of the file with `prop`.
///
/// Parameterless constructors get the property's default initializer (if it
/// has one). Parameterized constructors get a trailing parameter and an
/// assignment before their closing brace. Nested request handlers are
/// skipped entirely.
pub fn extend_constructors(src: &mut SourceFile, prop: &PropertyDefinition) -> PatchOutcome {
    let mut outcome = PatchOutcome::AlreadyPresent;
    let field = prop.field_name();
    let mut i = 0;

    while i < src.lines().len() {
        let line = src.lines()[i].clone();

        if is_handler_declaration(&line) {
            i = block_end(src.lines(), i).map_or(src.lines().len(), |end| end + 1);
            continue;
        }

        let Some(parameters) = constructor_parameters(&line) else {
            i += 1;
            continue;
        };
        let Some(close) = block_end(src.lines(), i).filter(|&close| close > i) else {
            i += 1;
            continue;
        };

        let assignment_value = if parameters.trim().is_empty() {
            prop.parameterless_initializer().map(str::to_string)
        } else {
            if !has_parameter(parameters, &field) {
                src.lines_mut()[i] = append_parameter(&line, prop);
                outcome = PatchOutcome::Applied;
            }
            Some(field.clone())
        };

        let mut next = close + 1;
        if let Some(value) = assignment_value {
            if !assigns(&src.lines()[i + 1..close], prop.name()) {
                let indent = format!("{}{MEMBER_INDENT}", leading_whitespace(&src.lines()[close]));
                src.insert_lines(close, &[format!("{indent}{} = {value};", prop.name())]);
                outcome = PatchOutcome::Applied;
                next += 1;
            }
        }
        i = next;
    }

    outcome
}

fn append_parameter(signature: &str, prop: &PropertyDefinition) -> String {
    let parameter = format!("{} {}", prop.declared_type(), prop.field_name());
    match signature.rfind(')') {
        Some(close) => format!("{}, {parameter}{}", &signature[..close], &signature[close..]),
        None => signature.to_string(),
    }
}

fn has_parameter(parameters: &str, field: &str) -> bool {
    parameters
        .split(',')
        .any(|p| p.split_whitespace().last() == Some(field))
}

fn assigns(body: &[String], member: &str) -> bool {
    let prefix = format!("{member} =");
    body.iter().any(|l| l.trim().starts_with(&prefix))
}

// ── Entity configuration ─────────────────────────────────────────────────────

/// Column mapping line, e.g.
/// `builder.Property(product => product.Name).HasColumnName("Name").IsRequired();`.
pub fn configuration_line(lambda: &str, prop: &PropertyDefinition) -> String {
    let required = if prop.is_nullable() { "" } else { ".IsRequired()" };
    format!(
        "        builder.Property({lambda} => {lambda}.{name}).HasColumnName(\"{name}\"){required};",
        name = prop.name()
    )
}

/// Add the column mapping for `prop` before the query-filter / relationship
/// lines, or after the last property mapping.
pub fn add_configuration_mapping(
    src: &mut SourceFile,
    lambda: &str,
    prop: &PropertyDefinition,
) -> Result<PatchOutcome, DomainError> {
    let accessor = format!(".{})", prop.name());
    let mapped = src.lines().iter().any(|l| {
        let l = l.trim();
        l.starts_with("builder.Property(") && l.contains(&accessor)
    });
    if mapped {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    let trailing = src.lines().iter().position(|l| {
        let l = l.trim();
        l.starts_with("builder.HasQueryFilter")
            || l.starts_with("builder.HasMany")
            || l.starts_with("builder.HasBaseType")
    });
    let index = match trailing {
        Some(mut index) => {
            while index > 0 && src.lines()[index - 1].trim().is_empty() {
                index -= 1;
            }
            index
        }
        None => src
            .lines()
            .iter()
            .rposition(|l| l.trim().starts_with("builder.Property("))
            .map(|last| last + 1)
            .ok_or_else(|| DomainError::NoInsertionPoint {
                file: src.display_name(),
            })?,
    };

    src.insert_lines(index, &[configuration_line(lambda, prop)]);
    Ok(PatchOutcome::Applied)
}

// ── Validators ───────────────────────────────────────────────────────────────

/// FluentValidation rule for `prop`, chosen by type.
pub fn validation_rule(prop: &PropertyDefinition) -> String {
    let name = prop.name();
    let prefix = format!("        RuleFor(command => command.{name})");
    let base = prop.base_type();
    let nullable = prop.is_nullable();

    let chain = if base.ends_with("[]") || base.contains('<') {
        ".NotNull()"
    } else {
        match base {
            "string" if nullable => ".MaximumLength(100)",
            "string" => ".NotEmpty().MinimumLength(1).MaximumLength(100)",
            "int" | "long" | "decimal" | "double" | "float" if !nullable => ".GreaterThan(0)",
            "bool" => {
                return format!("        // RuleFor(command => command.{name}) - Boolean validation if needed;");
            }
            "DateTime" | "Guid" if nullable => ".NotNull()",
            "DateTime" | "Guid" => ".NotEmpty()",
            "DateOnly" | "TimeOnly" if !nullable => ".NotEmpty()",
            _ if !nullable => ".NotNull()",
            _ => {
                return format!("        // RuleFor(command => command.{name}) - Add validation if needed;");
            }
        }
    };

    format!("{prefix}{chain};")
}

/// Add the rule for `prop` after the last `RuleFor(` line, or at the end of
/// the validator constructor when it has none yet.
pub fn add_validation_rule(
    src: &mut SourceFile,
    prop: &PropertyDefinition,
) -> Result<PatchOutcome, DomainError> {
    let existing = format!("RuleFor(command => command.{})", prop.name());
    if src.contains(&existing) {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    let after_last_rule = src
        .lines()
        .iter()
        .rposition(|l| l.trim().starts_with("RuleFor("))
        .map(|last| last + 1);
    let end_of_constructor = || {
        let start = src
            .lines()
            .iter()
            .position(|l| constructor_parameters(l).is_some())?;
        block_end(src.lines(), start).filter(|&close| close > start)
    };

    let index = after_last_rule
        .or_else(end_of_constructor)
        .ok_or_else(|| DomainError::NoInsertionPoint {
            file: src.display_name(),
        })?;

    src.insert_lines(index, &[validation_rule(prop)]);
    Ok(PatchOutcome::Applied)
}

/// Whether a mapping profile needs an explicit `ForMember` for this type.
///
/// Dates, times, `decimal` and unknown types do; common primitives do not.
pub fn needs_custom_mapping(declared_type: &str) -> bool {
    let base = declared_type.trim_end_matches('?').to_ascii_lowercase();
    match base.as_str() {
        "datetime" | "dateonly" | "timeonly" | "decimal" => true,
        "guid" | "string" | "int" | "long" | "bool" | "double" | "float" => false,
        _ => true,
    }
}

// ── Line shapes ──────────────────────────────────────────────────────────────

fn is_auto_property(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("public ") && line.contains("{ get; set; }")
}

/// Parameter text of a one-line constructor signature such as
/// `public Product(string name)`.
fn constructor_parameters(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("public ")?;
    let open = rest.find('(')?;
    let name = &rest[..open];
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let close = rest.rfind(')')?;
    (close > open).then(|| &rest[open + 1..close])
}

fn is_method(line: &str) -> bool {
    let line = line.trim();
    ["public ", "private ", "protected ", "internal "]
        .iter()
        .any(|m| line.starts_with(m))
        && line.contains('(')
        && line.contains(')')
        && !line.contains("=>")
        && !line.contains(" class ")
}

fn is_handler_declaration(line: &str) -> bool {
    line.contains("Handler ") && line.contains("IRequestHandler")
}

/// Index of the line closing the block opened at or after `start`.
fn block_end(lines: &[String], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut opened = false;
    for (index, line) in lines.iter().enumerate().skip(start) {
        for c in line.chars() {
            match c {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        if opened && depth <= 0 {
            return Some(index);
        }
    }
    None
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
