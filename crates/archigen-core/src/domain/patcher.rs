//! Text-surgery primitives over [`SourceFile`] lines.
//!
//! These know nothing about syntax beyond substring and line matching.
//! Correctness depends on markers being unique in the target file.

use crate::domain::{
    error::DomainError,
    source::{PatchOutcome, SourceFile},
};

/// Insert `import` after the leading block of `using` lines unless a line
/// with the same trimmed text already exists.
pub fn add_import_if_missing(src: &mut SourceFile, import: &str) -> PatchOutcome {
    let wanted = import.trim();
    if src.lines().iter().any(|l| l.trim() == wanted) {
        return PatchOutcome::AlreadyPresent;
    }

    let index = end_of_leading_imports(src.lines());
    src.insert_lines(index, &[import.to_string()]);
    PatchOutcome::Applied
}

/// Insert `content` right after the first line containing `marker`.
///
/// No-op when the trimmed `content` already appears contiguously anywhere.
pub fn insert_after_marker(
    src: &mut SourceFile,
    marker: &str,
    content: &[String],
) -> Result<PatchOutcome, DomainError> {
    let index = find_marker(src, marker)?;
    if contains_sequence(src.lines(), content) {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    src.insert_lines(index + 1, content);
    Ok(PatchOutcome::Applied)
}

/// Insert `line` right before the first line containing `marker`.
///
/// No-op when the exact line already exists.
pub fn insert_before_marker(
    src: &mut SourceFile,
    marker: &str,
    line: &str,
) -> Result<PatchOutcome, DomainError> {
    let index = find_marker(src, marker)?;
    if src.lines().iter().any(|l| l == line) {
        return Ok(PatchOutcome::AlreadyPresent);
    }

    src.insert_lines(index, &[line.to_string()]);
    Ok(PatchOutcome::Applied)
}

/// Replace every line whose trimmed text equals `from` with `to`, keeping
/// the original indentation.
pub fn replace_line(src: &mut SourceFile, from: &str, to: &str) -> PatchOutcome {
    let mut outcome = PatchOutcome::AlreadyPresent;
    for line in src.lines_mut() {
        if line.trim() == from {
            let indent = &line[..line.len() - line.trim_start().len()];
            *line = format!("{indent}{to}");
            outcome = PatchOutcome::Applied;
        }
    }
    outcome
}

/// Whether `needle` (trimmed, in order) appears as contiguous lines.
pub fn contains_sequence(lines: &[String], needle: &[String]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > lines.len() {
        return false;
    }

    lines.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(have, want)| have.trim() == want.trim())
    })
}

fn find_marker(src: &SourceFile, marker: &str) -> Result<usize, DomainError> {
    src.lines()
        .iter()
        .position(|l| l.contains(marker))
        .ok_or_else(|| DomainError::MarkerNotFound {
            marker: marker.to_string(),
            file: src.display_name(),
        })
}

/// Index just past the first contiguous `using` block of the preamble.
///
/// Blank and comment lines before it are skipped; 0 if there is none.
fn end_of_leading_imports(lines: &[String]) -> usize {
    let is_preamble = |l: &str| l.is_empty() || l.starts_with("//") || l.starts_with("using ");

    let Some(start) = lines
        .iter()
        .take_while(|l| is_preamble(l.trim()))
        .position(|l| l.trim().starts_with("using "))
    else {
        return 0;
    };

    let run = lines[start..]
        .iter()
        .take_while(|l| l.trim().starts_with("using "))
        .count();
    start + run
}
