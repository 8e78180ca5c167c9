//! Property addition across an existing artifact set.
//!
//! Workflow:
//! 1. Validate the property against the parsed entity (nothing written on failure)
//! 2. Patch the entity class, then every command, response and DTO class
//! 3. Add the column mapping and the validator rules
//! 4. Report advisories for files that are not edited automatically
//!
//! Every step after the first is independent: a missing file is skipped and
//! a file without a safe insertion point is left untouched and reported.

use std::{path::PathBuf, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::{
            entity_reader::EntityReader,
            report::{GenerationReport, ReportStatus},
            source_patcher::SourcePatcher,
        },
    },
    domain::{
        ArtifactKind, DEFAULT_DB_CONTEXT, DomainValidator, EntityDefinition, NameContext,
        ProjectLayout, PropertyDefinition,
        artifacts::{self, ArtifactContext},
        class_body,
    },
    error::{ArchigenError, ArchigenResult},
};

/// Classes that receive the property and have their constructors extended.
const CLASS_TARGETS: [ArtifactKind; 6] = [
    ArtifactKind::CreateCommand,
    ArtifactKind::UpdateCommand,
    ArtifactKind::CreatedResponse,
    ArtifactKind::UpdatedResponse,
    ArtifactKind::GetByIdResponse,
    ArtifactKind::GetListItemDto,
];

const VALIDATOR_TARGETS: [ArtifactKind; 2] =
    [ArtifactKind::CreateValidator, ArtifactKind::UpdateValidator];

pub struct PropertyService {
    patcher: SourcePatcher,
    reader: EntityReader,
    filesystem: Arc<dyn Filesystem>,
}

impl PropertyService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            patcher: SourcePatcher::new(filesystem.clone()),
            reader: EntityReader::new(filesystem.clone()),
            filesystem,
        }
    }

    /// Add `property_name: property_type` to `entity_name` and its artifacts.
    #[instrument(
        skip_all,
        fields(
            project = %layout.project_name(),
            entity = %entity_name,
            property = %property_name,
            ty = %property_type
        )
    )]
    pub fn add_property(
        &self,
        layout: &ProjectLayout,
        entity_name: &str,
        property_name: &str,
        property_type: &str,
    ) -> ArchigenResult<GenerationReport> {
        info!("Adding property");

        // 1. Validate
        DomainValidator::validate_name(entity_name, NameContext::Entity { existing: &[] })?;
        let entity_file = layout.entity_file(entity_name);
        let entity = self.reader.parse_entity(&entity_file)?;
        let prop =
            DomainValidator::validate_property(property_name, property_type, Some(entity.name()))?;

        let ctx = ArtifactContext {
            layout,
            entity: &entity,
            db_context: DEFAULT_DB_CONTEXT,
            enable_security: false,
        };
        let mut report = GenerationReport::new(entity.name());

        // 2. Entity first; if it cannot take the property nothing else is touched
        let status = self.patch_class(&entity_file, &prop)?;
        report.push(ArtifactKind::Entity, &entity_file, status);

        if !self.filesystem.is_dir(&ctx.feature_root()) {
            let reason = format!("feature folder {} not found", ctx.feature_root().display());
            warn!("{reason}");
            for kind in CLASS_TARGETS.into_iter().chain(VALIDATOR_TARGETS) {
                report.push(
                    kind,
                    artifacts::artifact_path(kind, &ctx),
                    ReportStatus::Skipped(reason.clone()),
                );
            }
        } else {
            for kind in CLASS_TARGETS {
                let path = artifacts::artifact_path(kind, &ctx);
                let status = self.patch_class(&path, &prop);
                report.push(kind, path, settle(kind, status));
            }
        }

        // 3. Mapping and validation
        let config = artifacts::artifact_path(ArtifactKind::EntityConfiguration, &ctx);
        let lambda = entity.lambda_name();
        let status = self
            .patcher
            .patch(&config, |src| class_body::add_configuration_mapping(src, &lambda, &prop))
            .map(|outcome| outcome.map_or_else(|| missing(&config), ReportStatus::from));
        report.push(
            ArtifactKind::EntityConfiguration,
            &config,
            settle(ArtifactKind::EntityConfiguration, status),
        );

        if self.filesystem.is_dir(&ctx.feature_root()) {
            for kind in VALIDATOR_TARGETS {
                let path = artifacts::artifact_path(kind, &ctx);
                let status = self
                    .patcher
                    .patch(&path, |src| class_body::add_validation_rule(src, &prop))
                    .map(|outcome| outcome.map_or_else(|| missing(&path), ReportStatus::from));
                report.push(kind, path, settle(kind, status));
            }
        }

        // 4. Advisories
        self.push_advisories(&mut report, &ctx, &entity, &prop);

        info!(
            written = report.written(),
            failures = report.failures().count(),
            "Property added"
        );
        Ok(report)
    }

    /// Declaration plus constructor extension for one class file.
    fn patch_class(
        &self,
        path: &std::path::Path,
        prop: &PropertyDefinition,
    ) -> ArchigenResult<ReportStatus> {
        let outcome = self.patcher.patch(path, |src| {
            let declared = class_body::add_property(src, prop)?;
            Ok(declared.or(class_body::extend_constructors(src, prop)))
        })?;
        Ok(outcome.map_or_else(|| missing(path), ReportStatus::from))
    }

    fn push_advisories(
        &self,
        report: &mut GenerationReport,
        ctx: &ArtifactContext<'_>,
        entity: &EntityDefinition,
        prop: &PropertyDefinition,
    ) {
        let name = prop.name();
        let advise = |kind: ArtifactKind, message: String| -> (ArtifactKind, PathBuf, ReportStatus) {
            (kind, artifacts::artifact_path(kind, ctx), ReportStatus::Advisory(message))
        };

        let mut advisories = Vec::new();

        let profiles = artifacts::artifact_path(ArtifactKind::MappingProfiles, ctx);
        if self.filesystem.exists(&profiles) {
            let message = if class_body::needs_custom_mapping(prop.declared_type()) {
                format!(
                    "consider a custom mapping for {name} ({}): .ForMember(dest => dest.{name}, opt => opt.MapFrom(src => src.{name}))",
                    prop.declared_type()
                )
            } else {
                format!("{name} is mapped automatically")
            };
            advisories.push(advise(ArtifactKind::MappingProfiles, message));
        }

        advisories.push(advise(
            ArtifactKind::DbContext,
            format!(
                "DbSet<{}> needs no change; add a migration for the new column",
                entity.name()
            ),
        ));
        advisories.push(advise(
            ArtifactKind::BusinessRules,
            format!("review {}BusinessRules for rules involving {name}", entity.name()),
        ));
        advisories.push(advise(
            ArtifactKind::Controller,
            format!("{name} flows through the existing endpoints; update API docs if any"),
        ));

        for (kind, path, status) in advisories {
            report.push(kind, path, status);
        }
    }
}

fn missing(path: &std::path::Path) -> ReportStatus {
    warn!(path = %path.display(), "File not found, skipped");
    ReportStatus::Skipped(format!("{} not found", path.display()))
}

/// Turn a per-file failure into a report entry.
fn settle(kind: ArtifactKind, status: ArchigenResult<ReportStatus>) -> ReportStatus {
    status.unwrap_or_else(|err: ArchigenError| {
        warn!(artifact = %kind, error = %err, "File left untouched");
        ReportStatus::Failed(ApplicationError::generation(kind, err).into())
    })
}
