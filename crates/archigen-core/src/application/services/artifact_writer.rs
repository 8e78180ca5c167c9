//! Writes rendered artifacts under their idempotency policy.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{ports::Filesystem, services::report::ReportStatus},
    domain::artifacts::{RenderedArtifact, WriteDecision, decide_write},
    error::ArchigenResult,
};

pub struct ArtifactWriter {
    filesystem: Arc<dyn Filesystem>,
}

impl ArtifactWriter {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Create, replace or leave the artifact's file.
    ///
    /// An existing file is compared byte for byte first; a differing file is
    /// replaced only when its policy proves it stale.
    #[instrument(skip_all, fields(artifact = %artifact.kind, path = %artifact.path.display()))]
    pub fn write(&self, artifact: &RenderedArtifact) -> ArchigenResult<ReportStatus> {
        let existing = if self.filesystem.exists(&artifact.path) {
            Some(self.filesystem.read_to_string(&artifact.path)?)
        } else {
            None
        };

        let decision = decide_write(existing.as_deref(), &artifact.content, &artifact.policy);
        match decision {
            WriteDecision::Create | WriteDecision::Replace => {
                if let Some(parent) = artifact.path.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(&artifact.path, &artifact.content)?;
            }
            WriteDecision::Unchanged | WriteDecision::Preserve => {}
        }

        debug!(?decision, "artifact processed");
        Ok(decision.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fake_fs::FakeFilesystem;
    use crate::domain::{ArtifactKind, artifacts::WritePolicy};
    use std::path::PathBuf;

    fn artifact(content: &str, policy: WritePolicy) -> RenderedArtifact {
        RenderedArtifact {
            kind: ArtifactKind::BusinessRules,
            path: PathBuf::from("/p/Rules/ProductBusinessRules.cs"),
            content: content.to_string(),
            policy,
        }
    }

    #[test]
    fn create_then_unchanged() {
        let fs = FakeFilesystem::new();
        let writer = ArtifactWriter::new(fs.clone());
        let a = artifact("class R {}\n", WritePolicy::CreateOnce);

        assert!(matches!(writer.write(&a).unwrap(), ReportStatus::Created));
        assert!(matches!(writer.write(&a).unwrap(), ReportStatus::Unchanged));
        assert_eq!(fs.writes(), 1);
    }

    #[test]
    fn hand_edits_survive_unless_stale() {
        let fs = FakeFilesystem::with_files([(
            "/p/Rules/ProductBusinessRules.cs",
            "class R { /* mine */ }\n",
        )]);
        let writer = ArtifactWriter::new(fs.clone());

        let policy = WritePolicy::ReplaceIfStale(vec!["Core.CrossCuttingConcerns.Exceptions".into()]);
        let a = artifact("class R {}\n", policy.clone());
        assert!(matches!(writer.write(&a).unwrap(), ReportStatus::Preserved));
        assert_eq!(fs.writes(), 0);

        fs.seed(
            "/p/Rules/ProductBusinessRules.cs",
            "using Core.CrossCuttingConcerns.Exceptions;\n",
        );
        assert!(matches!(writer.write(&a).unwrap(), ReportStatus::Updated));
        assert_eq!(fs.read("/p/Rules/ProductBusinessRules.cs").as_deref(), Some("class R {}\n"));
    }
}
