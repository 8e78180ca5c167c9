//! Per-artifact outcome of a generation or property-addition run.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::domain::{ArtifactKind, PatchOutcome, artifacts::WriteDecision};
use crate::error::ArchigenError;

/// What happened to one artifact.
#[derive(Debug, Clone)]
pub enum ReportStatus {
    /// New file written.
    Created,
    /// Existing file replaced or patched.
    Updated,
    /// Already up to date.
    Unchanged,
    /// Existing file differs but could not be proven stale; left alone.
    Preserved,
    /// Not attempted, with the reason.
    Skipped(String),
    /// Nothing written; the user should look at this by hand.
    Advisory(String),
    /// Attempted and failed; other artifacts were still processed.
    Failed(ArchigenError),
}

impl ReportStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Preserved => "preserved",
            Self::Skipped(_) => "skipped",
            Self::Advisory(_) => "advisory",
            Self::Failed(_) => "failed",
        }
    }

    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Skipped(reason) | Self::Advisory(reason) => Some(reason.clone()),
            Self::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl From<WriteDecision> for ReportStatus {
    fn from(decision: WriteDecision) -> Self {
        match decision {
            WriteDecision::Create => Self::Created,
            WriteDecision::Replace => Self::Updated,
            WriteDecision::Unchanged => Self::Unchanged,
            WriteDecision::Preserve => Self::Preserved,
        }
    }
}

impl From<PatchOutcome> for ReportStatus {
    fn from(outcome: PatchOutcome) -> Self {
        match outcome {
            PatchOutcome::Applied => Self::Updated,
            PatchOutcome::AlreadyPresent => Self::Unchanged,
        }
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ReportStatus", 2)?;
        state.serialize_field("status", self.label())?;
        state.serialize_field("detail", &self.detail())?;
        state.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub artifact: ArtifactKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ReportStatus,
}

/// Ordered list of [`ReportEntry`] for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    entity: String,
    entries: Vec<ReportEntry>,
}

impl GenerationReport {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            entries: Vec::new(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn push(&mut self, artifact: ArtifactKind, path: impl AsRef<Path>, status: ReportStatus) {
        self.entries.push(ReportEntry {
            artifact,
            path: path.as_ref().to_path_buf(),
            status,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn get(&self, artifact: ArtifactKind) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.artifact == artifact)
    }

    /// Number of files created or updated.
    pub fn written(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_write()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, ReportStatus::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
