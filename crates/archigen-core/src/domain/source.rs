//! Line-oriented view of a source file.
//!
//! Patches work on whole-file line arrays. The original line ending and the
//! trailing-newline state are preserved on render.

use std::path::{Path, PathBuf};

/// Result of an idempotent edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    AlreadyPresent,
}

impl PatchOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    /// `Applied` if either side was applied.
    pub fn or(self, other: Self) -> Self {
        if self.is_applied() || other.is_applied() {
            Self::Applied
        } else {
            Self::AlreadyPresent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    lines: Vec<String>,
    line_ending: LineEnding,
    trailing_newline: bool,
}

impl SourceFile {
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Self {
        let line_ending = if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);

        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                .collect()
        };

        Self {
            path: path.into(),
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name used in error messages.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    pub fn insert_lines(&mut self, index: usize, lines: &[String]) {
        let index = index.min(self.lines.len());
        self.lines.splice(index..index, lines.iter().cloned());
    }

    pub fn render(&self) -> String {
        let eol = match self.line_ending {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        };
        let mut out = self.lines.join(eol);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(eol);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_round_trips_text() {
        for text in ["a\nb\n", "a\nb", "a\r\nb\r\n", "", "\n", "x\n\n"] {
            assert_eq!(SourceFile::parse("f.cs", text).render(), text, "{text:?}");
        }
    }

    #[test]
    fn crlf_lines_are_clean() {
        let src = SourceFile::parse("f.cs", "using A;\r\nusing B;\r\n");
        assert_eq!(src.lines(), &["using A;", "using B;"]);
    }

    #[test]
    fn outcome_or() {
        assert_eq!(
            PatchOutcome::AlreadyPresent.or(PatchOutcome::Applied),
            PatchOutcome::Applied
        );
        assert_eq!(
            PatchOutcome::AlreadyPresent.or(PatchOutcome::AlreadyPresent),
            PatchOutcome::AlreadyPresent
        );
    }
}
