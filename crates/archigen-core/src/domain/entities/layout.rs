use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::{error::DomainError, naming::to_pascal_case, value_objects::Layer};

/// Resolved directories of a generated solution.
///
/// ```text
/// <root>/
/// ├── core/
/// └── project/
///     ├── <Name>.Application/
///     ├── <Name>.Domain/
///     ├── <Name>.Infrastructure/
///     ├── <Name>.Persistence/
///     └── <Name>.WebAPI/
/// ```
///
/// Pure value; existence on disk is checked by the services through the
/// filesystem port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    solution_root: PathBuf,
    project_name: String,
}

impl ProjectLayout {
    pub fn new(solution_root: impl Into<PathBuf>, project_name: &str) -> Result<Self, DomainError> {
        let solution_root = solution_root.into();
        if solution_root.as_os_str().is_empty() {
            return Err(DomainError::InvalidInput {
                message: "solution root cannot be empty".into(),
            });
        }

        Ok(Self {
            solution_root,
            project_name: to_pascal_case(project_name)?,
        })
    }

    pub fn solution_root(&self) -> &Path {
        &self.solution_root
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn core_root(&self) -> PathBuf {
        self.solution_root.join("core")
    }

    pub fn project_root(&self) -> PathBuf {
        self.solution_root.join("project")
    }

    pub fn layer_path(&self, layer: Layer) -> PathBuf {
        self.project_root()
            .join(format!("{}.{}", self.project_name, layer.as_str()))
    }

    /// Namespace of a layer, e.g. `Shop.Persistence`.
    pub fn namespace(&self, layer: Layer) -> String {
        format!("{}.{}", self.project_name, layer.as_str())
    }

    pub fn application(&self) -> PathBuf {
        self.layer_path(Layer::Application)
    }

    pub fn domain(&self) -> PathBuf {
        self.layer_path(Layer::Domain)
    }

    pub fn persistence(&self) -> PathBuf {
        self.layer_path(Layer::Persistence)
    }

    pub fn web_api(&self) -> PathBuf {
        self.layer_path(Layer::WebApi)
    }

    pub fn entities_dir(&self) -> PathBuf {
        self.domain().join("Entities")
    }

    pub fn entity_file(&self, entity_name: &str) -> PathBuf {
        self.entities_dir().join(format!("{entity_name}.cs"))
    }

    /// `Application/Features/<Plural>`.
    pub fn feature_root(&self, plural: &str) -> PathBuf {
        self.application().join("Features").join(plural)
    }

    pub fn contexts_dir(&self) -> PathBuf {
        self.persistence().join("Contexts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_paths() {
        let layout = ProjectLayout::new("/work/shop", "shop").unwrap();
        assert_eq!(layout.project_name(), "Shop");
        assert_eq!(layout.core_root(), PathBuf::from("/work/shop/core"));
        assert_eq!(
            layout.layer_path(Layer::WebApi),
            PathBuf::from("/work/shop/project/Shop.WebAPI")
        );
        assert_eq!(
            layout.entity_file("Product"),
            PathBuf::from("/work/shop/project/Shop.Domain/Entities/Product.cs")
        );
    }

    #[test]
    fn rejects_blank_inputs() {
        assert!(ProjectLayout::new("", "Shop").is_err());
        assert!(ProjectLayout::new("/work", " ").is_err());
    }

    #[test]
    fn namespaces() {
        let layout = ProjectLayout::new("/w", "Shop").unwrap();
        assert_eq!(layout.namespace(Layer::Persistence), "Shop.Persistence");
    }
}
