//! CRUD generation - the main application orchestrator.
//!
//! This service coordinates one `generateCrud` run:
//! 1. Validate every input and check the project layers exist
//! 2. Resolve the entity (parse the existing file, or build it from options)
//! 3. Render and write each artifact under its idempotency policy
//! 4. Patch the shared composition-root files
//!
//! Nothing is written when step 1 or 2 fails. From step 3 on, a failing
//! artifact is recorded in the report and the run continues.

use std::{path::Path, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::{
            artifact_writer::ArtifactWriter,
            entity_reader::EntityReader,
            report::{GenerationReport, ReportStatus},
            source_patcher::SourcePatcher,
        },
    },
    domain::{
        ArtifactKind, DomainError, DomainValidator, EntityDefinition, GenerationOptions, Layer,
        PatchOutcome, ProjectLayout,
        artifacts::{self, ArtifactContext, LegacyServiceFolder},
        naming::to_pascal_case,
    },
    error::{ArchigenError, ArchigenResult},
};

/// Layers that must exist before anything is generated.
const REQUIRED_LAYERS: [Layer; 4] = [
    Layer::Domain,
    Layer::Application,
    Layer::Persistence,
    Layer::WebApi,
];

pub struct CrudService {
    filesystem: Arc<dyn Filesystem>,
    writer: ArtifactWriter,
    patcher: SourcePatcher,
    reader: EntityReader,
}

impl CrudService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            writer: ArtifactWriter::new(filesystem.clone()),
            patcher: SourcePatcher::new(filesystem.clone()),
            reader: EntityReader::new(filesystem.clone()),
            filesystem,
        }
    }

    /// Generate (or refresh) the full artifact set for one entity.
    #[instrument(
        skip_all,
        fields(
            project = %layout.project_name(),
            entity = %options.entity_name,
            security = options.enable_security
        )
    )]
    pub fn generate(
        &self,
        layout: &ProjectLayout,
        options: &GenerationOptions,
    ) -> ArchigenResult<GenerationReport> {
        info!("Generating CRUD artifacts");

        // 1. Validate inputs and layout
        self.check_layers(layout)?;
        let db_context = validate_db_context(&options.db_context_name)?;

        // 2. Resolve entity
        let entity = self.resolve_entity(layout, options)?;
        info!(
            entity = entity.name(),
            properties = entity.properties().len(),
            "Entity resolved"
        );

        let ctx = ArtifactContext {
            layout,
            entity: &entity,
            db_context: &db_context,
            enable_security: options.enable_security,
        };

        // 3 + 4. Artifacts in order
        let mut report = GenerationReport::new(entity.name());
        for kind in ArtifactKind::ALL {
            if kind == ArtifactKind::ServiceInterface {
                self.adopt_legacy_service_folder(&ctx);
            }

            let path = artifacts::artifact_path(kind, &ctx);
            let status = match self.process(kind, &ctx) {
                Ok(Some(status)) => status,
                Ok(None) => continue,
                Err(err) => {
                    warn!(artifact = %kind, error = %err, "Artifact failed");
                    ReportStatus::Failed(ApplicationError::generation(kind, err).into())
                }
            };
            report.push(kind, path, status);

            if kind == ArtifactKind::ServiceManager {
                if let Err(err) = self.remove_obsolete_service_folder(&ctx) {
                    warn!(error = %err, "Could not clean up legacy service folder");
                }
            }
        }

        info!(
            written = report.written(),
            failures = report.failures().count(),
            "CRUD generation finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn check_layers(&self, layout: &ProjectLayout) -> ArchigenResult<()> {
        for layer in REQUIRED_LAYERS {
            let path = layout.layer_path(layer);
            if !self.filesystem.is_dir(&path) {
                return Err(ApplicationError::MissingDependency {
                    path,
                    what: format!("{layer} layer"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Parse the existing entity file, or validate and build a new entity.
    fn resolve_entity(
        &self,
        layout: &ProjectLayout,
        options: &GenerationOptions,
    ) -> ArchigenResult<EntityDefinition> {
        let name = to_pascal_case(&options.entity_name)?;
        let entity_file = layout.entity_file(&name);

        if self.filesystem.exists(&entity_file) {
            info!(path = %entity_file.display(), "Reusing existing entity");
            return self.reader.parse_entity(&entity_file);
        }

        let existing = self.reader.list_entities(layout)?;
        DomainValidator::validate_entity_name(&name, &existing)?;

        if options.properties.is_empty() {
            return Err(ApplicationError::ValidationFailed(format!(
                "Entity '{name}' does not exist yet; provide properties to create it"
            ))
            .into());
        }

        let id_type = DomainValidator::validate_type(&options.id_type)?;
        let properties = options
            .properties
            .iter()
            .map(|p| DomainValidator::validate_property(p.name(), p.declared_type(), Some(&name)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EntityDefinition::new(&name, &id_type, properties)?)
    }

    /// `Ok(None)` when the artifact does not apply to this run.
    fn process(
        &self,
        kind: ArtifactKind,
        ctx: &ArtifactContext<'_>,
    ) -> ArchigenResult<Option<ReportStatus>> {
        use ArtifactKind as K;

        if !kind.is_patch() {
            return match artifacts::render(kind, ctx) {
                Some(rendered) => self.writer.write(&rendered).map(Some),
                None => Ok(None),
            };
        }

        let path = artifacts::artifact_path(kind, ctx);
        let outcome = match kind {
            K::RepositoryRegistration => self
                .patcher
                .patch(&path, |src| artifacts::patch_repository_registration(src, ctx))?,
            K::DbContext => self
                .patcher
                .patch(&path, |src| Ok(artifacts::patch_db_context(src, ctx)))?,
            K::ServiceRegistration => {
                let services_root = ctx.layout.application().join("Services");
                let folder_exists = |folder: &str| self.filesystem.is_dir(&services_root.join(folder));
                self.patcher.patch(&path, |src| {
                    artifacts::patch_service_registration(src, ctx, folder_exists)
                })?
            }
            K::OperationClaimSeed if !ctx.enable_security => return Ok(None),
            K::OperationClaimSeed => {
                match self
                    .patcher
                    .patch(&path, |src| artifacts::patch_operation_claims(src, ctx))
                {
                    Err(ArchigenError::Domain(err @ DomainError::MarkerNotFound { .. })) => {
                        warn!(error = %err, "Permission seed left unchanged");
                        return Ok(Some(ReportStatus::Skipped(err.to_string())));
                    }
                    other => other?,
                }
            }
            _ => return Ok(None),
        };

        Ok(Some(patch_status(&path, outcome)))
    }

    /// Move `Services/<Plural>` to `Services/<Plural>Service` when only the
    /// old folder exists.
    fn adopt_legacy_service_folder(&self, ctx: &ArtifactContext<'_>) {
        let legacy = ctx.legacy_service_folder();
        let current = ctx.service_folder();
        if self.filesystem.is_dir(&legacy) && !self.filesystem.exists(&current) {
            match self.filesystem.rename(&legacy, &current) {
                Ok(()) => info!(from = %legacy.display(), to = %current.display(), "Moved legacy service folder"),
                Err(err) => warn!(error = %err, "Could not move legacy service folder"),
            }
        }
    }

    fn remove_obsolete_service_folder(&self, ctx: &ArtifactContext<'_>) -> ArchigenResult<()> {
        let legacy = ctx.legacy_service_folder();
        if !self.filesystem.is_dir(&legacy) {
            return Ok(());
        }

        let mut entries = Vec::new();
        for entry in self.filesystem.list_dir(&legacy)? {
            let text = if entry.is_dir {
                None
            } else {
                self.filesystem.read_to_string(&entry.path).ok()
            };
            entries.push((entry.name, text));
        }

        let new_folder_exists = self.filesystem.is_dir(&ctx.service_folder());
        if artifacts::legacy_service_folder(ctx, &entries, new_folder_exists)
            == LegacyServiceFolder::Remove
        {
            self.filesystem.remove_dir_all(&legacy)?;
            info!(path = %legacy.display(), "Removed obsolete service folder");
        }
        Ok(())
    }
}

fn validate_db_context(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if DomainValidator::is_valid_identifier(name) {
        Ok(name.to_string())
    } else {
        Err(DomainError::InvalidInput {
            message: format!("'{name}' is not a valid DbContext class name"),
        })
    }
}

fn patch_status(path: &Path, outcome: Option<PatchOutcome>) -> ReportStatus {
    match outcome {
        Some(outcome) => outcome.into(),
        None => {
            warn!(path = %path.display(), "Shared file not found, registration skipped");
            ReportStatus::Skipped(format!("{} not found", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::fake_fs::FakeFilesystem;
    use crate::domain::{DomainValidator, NameViolation, PropertyDefinition};

    const REGISTRATION: &str = "\
using Microsoft.Extensions.DependencyInjection;

namespace Shop.Persistence;

public static class PersistenceServiceRegistration
{
    public static IServiceCollection AddPersistenceServices(this IServiceCollection services)
    {
        return services;
    }
}
";

    fn project() -> (Arc<FakeFilesystem>, ProjectLayout) {
        let layout = ProjectLayout::new("/w", "Shop").unwrap();
        let fs = FakeFilesystem::new();
        for layer in REQUIRED_LAYERS {
            fs.mkdir(layout.layer_path(layer));
        }
        (fs, layout)
    }

    fn product_options() -> GenerationOptions {
        let props = DomainValidator::parse_properties(
            "Name:string,Price:decimal,IsActive:bool?",
            Some("Product"),
        )
        .unwrap();
        GenerationOptions::new("Shop", "Product").with_properties(props)
    }

    #[test]
    fn missing_layer_blocks_everything() {
        let layout = ProjectLayout::new("/w", "Shop").unwrap();
        let fs = FakeFilesystem::new();
        fs.mkdir(layout.domain());

        let err = CrudService::new(fs.clone())
            .generate(&layout, &product_options())
            .unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Application(ApplicationError::MissingDependency { .. })
        ));
        assert_eq!(fs.writes(), 0);
    }

    #[test]
    fn new_entity_without_properties_is_rejected() {
        let (fs, layout) = project();
        let err = CrudService::new(fs.clone())
            .generate(&layout, &GenerationOptions::new("Shop", "Product"))
            .unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Application(ApplicationError::ValidationFailed(_))
        ));
        assert_eq!(fs.writes(), 0);
    }

    #[test]
    fn invalid_names_write_nothing() {
        let (fs, layout) = project();
        let service = CrudService::new(fs.clone());

        let err = service
            .generate(&layout, &GenerationOptions::new("Shop", "Entity").with_properties(
                product_options().properties,
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Domain(DomainError::InvalidName {
                violation: NameViolation::Denylisted,
                ..
            })
        ));

        let err = service
            .generate(&layout, &product_options().with_db_context("Base Context"))
            .unwrap_err();
        assert!(matches!(err, ArchigenError::Domain(DomainError::InvalidInput { .. })));
        assert_eq!(fs.writes(), 0);
    }

    #[test]
    fn invalid_property_type_writes_nothing() {
        let (fs, layout) = project();
        let props = [("Price", "sting"), ("Code", "money")]
            .into_iter()
            .map(|(name, ty)| PropertyDefinition::new(name, ty).unwrap())
            .collect();
        let options = GenerationOptions::new("Shop", "Invoice").with_properties(props);

        let err = CrudService::new(fs.clone()).generate(&layout, &options).unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Domain(DomainError::InvalidType { .. })
        ));
        assert_eq!(fs.writes(), 0);
        assert!(!fs.exists(&layout.entity_file("Invoice")));
    }

    #[test]
    fn generates_artifacts_and_skips_missing_shared_files() {
        let (fs, layout) = project();
        fs.seed(
            layout.persistence().join("PersistenceServiceRegistration.cs"),
            REGISTRATION,
        );

        let report = CrudService::new(fs.clone())
            .generate(&layout, &product_options())
            .unwrap();

        assert!(!report.has_failures());
        assert!(matches!(
            report.get(ArtifactKind::Entity).map(|e| &e.status),
            Some(ReportStatus::Created)
        ));
        assert!(matches!(
            report.get(ArtifactKind::RepositoryRegistration).map(|e| &e.status),
            Some(ReportStatus::Updated)
        ));
        assert!(matches!(
            report.get(ArtifactKind::DbContext).map(|e| &e.status),
            Some(ReportStatus::Skipped(_))
        ));
        assert!(report.get(ArtifactKind::OperationClaims).is_none());
        assert!(report.get(ArtifactKind::OperationClaimSeed).is_none());

        let registration = fs
            .read(layout.persistence().join("PersistenceServiceRegistration.cs"))
            .unwrap();
        assert!(registration.contains("services.AddScoped<IProductRepository, ProductRepository>();"));
    }

    #[test]
    fn second_run_changes_nothing() {
        let (fs, layout) = project();
        fs.seed(
            layout.persistence().join("PersistenceServiceRegistration.cs"),
            REGISTRATION,
        );
        let service = CrudService::new(fs.clone());

        service.generate(&layout, &product_options()).unwrap();
        let writes = fs.writes();

        let report = service
            .generate(&layout, &GenerationOptions::new("Shop", "Product"))
            .unwrap();
        assert_eq!(report.written(), 0);
        assert_eq!(fs.writes(), writes);
    }

    #[test]
    fn casing_collision_with_existing_entity() {
        let (fs, layout) = project();
        fs.seed(
            layout.entity_file("Product"),
            "public class Product : Entity<int> {}\n",
        );

        let options = GenerationOptions::new("Shop", "PRODuct")
            .with_properties(product_options().properties);
        let err = CrudService::new(fs).generate(&layout, &options).unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Domain(DomainError::DuplicateEntity { .. })
        ));
    }

    #[test]
    fn legacy_service_folder_is_adopted() {
        let (fs, layout) = project();
        let legacy = layout.application().join("Services").join("Products");
        fs.seed(legacy.join("Notes.md"), "keep me");

        CrudService::new(fs.clone())
            .generate(&layout, &product_options())
            .unwrap();

        let current = layout.application().join("Services").join("ProductsService");
        assert_eq!(fs.read(current.join("Notes.md")).as_deref(), Some("keep me"));
        assert!(fs.read(current.join("ProductManager.cs")).is_some());
        assert!(!fs.exists(&legacy));
    }
}
