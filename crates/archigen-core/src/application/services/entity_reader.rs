//! Reads entity definitions back from generated source files.

use std::{path::Path, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{EntityDefinition, EntityParser, ProjectLayout},
    error::ArchigenResult,
};

pub struct EntityReader {
    filesystem: Arc<dyn Filesystem>,
}

impl EntityReader {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Parse the entity declared in `path`.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn parse_entity(&self, path: &Path) -> ArchigenResult<EntityDefinition> {
        if !self.filesystem.exists(path) {
            return Err(ApplicationError::MissingDependency {
                path: path.to_path_buf(),
                what: "entity file".into(),
            }
            .into());
        }

        let text = self.filesystem.read_to_string(path)?;
        let entity = EntityParser::parse(&path.display().to_string(), &text)?;
        debug!(
            entity = entity.name(),
            properties = entity.properties().len(),
            "entity parsed"
        );
        Ok(entity)
    }

    /// Names of the entities under `Domain/Entities`, from their file stems.
    ///
    /// Empty when the folder does not exist yet.
    pub fn list_entities(&self, layout: &ProjectLayout) -> ArchigenResult<Vec<String>> {
        let dir = layout.entities_dir();
        if !self.filesystem.is_dir(&dir) {
            return Ok(Vec::new());
        }

        Ok(self
            .filesystem
            .list_dir(&dir)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| entry.name.strip_suffix(".cs").map(str::to_string))
            .collect())
    }
}
