//! File-level wrappers over the text-surgery primitives.
//!
//! Each call is one read-modify-write of a single file. The file is written
//! back whole, and only when an edit was actually applied.

use std::{path::Path, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{DomainError, PatchOutcome, SourceFile},
    error::ArchigenResult,
};

pub struct SourcePatcher {
    filesystem: Arc<dyn Filesystem>,
}

impl SourcePatcher {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Apply `edit` to the file at `path`.
    ///
    /// `Ok(None)` when the file does not exist. On error the file is left
    /// untouched.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn patch<F>(&self, path: &Path, edit: F) -> ArchigenResult<Option<PatchOutcome>>
    where
        F: FnOnce(&mut SourceFile) -> Result<PatchOutcome, DomainError>,
    {
        if !self.filesystem.exists(path) {
            debug!("patch target missing");
            return Ok(None);
        }

        let text = self.filesystem.read_to_string(path)?;
        let mut src = SourceFile::parse(path, &text);
        let outcome = edit(&mut src)?;

        if outcome.is_applied() {
            self.filesystem.write_file(path, &src.render())?;
            debug!("patched");
        }
        Ok(Some(outcome))
    }
}
