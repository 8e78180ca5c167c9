//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ArtifactKind;
use crate::error::{ArchigenError, ErrorCategory};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A directory or file the use case relies on is absent.
    #[error("Missing {what} at {path}")]
    MissingDependency { path: PathBuf, what: String },

    /// One artifact could not be produced.
    #[error("Failed to generate {artifact}: {source}")]
    GenerationFailed {
        artifact: ArtifactKind,
        #[source]
        source: Box<ArchigenError>,
    },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The external build tool exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    ToolFailed { command: String, stderr: String },

    /// In-memory state was poisoned by a panicking writer.
    #[error("Internal lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn generation(artifact: ArtifactKind, source: impl Into<ArchigenError>) -> Self {
        Self::GenerationFailed {
            artifact,
            source: Box::new(source.into()),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::MissingDependency { path, what } => vec![
                format!("Expected {what} at {}", path.display()),
                "Check the solution root (--solution) and project name".into(),
                "Create the project first with: archigen new <NAME>".into(),
            ],
            Self::GenerationFailed { source, .. } => source.suggestions(),
            Self::ValidationFailed(_) => vec![
                "Pass properties with --props \"Name:string,Price:decimal\"".into(),
            ],
            Self::ToolFailed { command, .. } => vec![
                format!("Run `{command}` by hand to see the full output"),
                "Check that the dotnet SDK and dotnet-ef are installed".into(),
            ],
            Self::LockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::LockPoisoned | Self::ToolFailed { .. } => {
                ErrorCategory::Internal
            }
            Self::MissingDependency { .. } => ErrorCategory::NotFound,
            Self::GenerationFailed { source, .. } => source.category(),
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
