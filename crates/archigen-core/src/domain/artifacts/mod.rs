//! Deterministic source renderers, one per [`ArtifactKind`].
//!
//! Rendering is pure: every function takes an [`ArtifactContext`] and returns
//! text. Whether that text reaches disk is decided by [`decide_write`] using
//! the artifact's [`WritePolicy`]; patch artifacts (registrations, DbContext,
//! permission seed) are edits to shared files and live beside their renderers
//! as `patch_*` functions over a [`SourceFile`](crate::domain::SourceFile).

mod application;
mod entity;
mod persistence;
mod security;
mod services;
mod web;

use std::path::PathBuf;

use crate::domain::{
    entities::{EntityDefinition, ProjectLayout, PropertyDefinition},
    value_objects::ArtifactKind,
};

pub use persistence::{patch_db_context, patch_repository_registration};
pub use security::{OPERATION_CLAIM_SEED_FILE, patch_operation_claims};
pub use services::{LegacyServiceFolder, legacy_service_folder, patch_service_registration};

// ── Builder ──────────────────────────────────────────────────────────────────

/// Line-at-a-time text builder. Every line ends with `\n`.
#[derive(Debug, Default)]
pub struct SourceBuilder {
    buf: String,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(line.as_ref());
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

// ── Context ──────────────────────────────────────────────────────────────────

/// Everything a renderer needs for one entity.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactContext<'a> {
    pub layout: &'a ProjectLayout,
    pub entity: &'a EntityDefinition,
    pub db_context: &'a str,
    pub enable_security: bool,
}

impl<'a> ArtifactContext<'a> {
    pub fn project(&self) -> &'a str {
        self.layout.project_name()
    }

    pub fn name(&self) -> &'a str {
        self.entity.name()
    }

    pub fn plural(&self) -> String {
        self.entity.plural_name()
    }

    /// camelCase entity name used for locals and fields.
    pub fn camel(&self) -> String {
        self.entity.field_name()
    }

    pub fn id_type(&self) -> &'a str {
        self.entity.id_type()
    }

    pub fn properties(&self) -> &'a [PropertyDefinition] {
        self.entity.properties()
    }

    /// `<Project>.Application.Features.<Plural>.<suffix>`.
    pub fn feature_namespace(&self, suffix: &str) -> String {
        format!(
            "{}.Application.Features.{}.{}",
            self.project(),
            self.plural(),
            suffix
        )
    }

    pub fn feature_root(&self) -> PathBuf {
        self.layout.feature_root(&self.plural())
    }

    /// `Application/Services/<Plural>Service`.
    pub fn service_folder(&self) -> PathBuf {
        self.layout
            .application()
            .join("Services")
            .join(format!("{}Service", self.plural()))
    }

    /// `Application/Services/<Plural>`, the folder older generators used.
    pub fn legacy_service_folder(&self) -> PathBuf {
        self.layout.application().join("Services").join(self.plural())
    }
}

// ── Write policy ─────────────────────────────────────────────────────────────

/// How an existing file that differs from the fresh rendering is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePolicy {
    /// Written when missing, never touched afterwards.
    CreateOnce,
    /// Replaced only when the existing text contains one of these markers
    /// left by an older generator.
    ReplaceIfStale(Vec<String>),
}

impl WritePolicy {
    pub fn is_stale(&self, existing: &str) -> bool {
        match self {
            Self::CreateOnce => false,
            Self::ReplaceIfStale(markers) => markers.iter().any(|m| existing.contains(m.as_str())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Create,
    Replace,
    Unchanged,
    Preserve,
}

/// Byte-compare first, then consult the policy.
pub fn decide_write(existing: Option<&str>, rendered: &str, policy: &WritePolicy) -> WriteDecision {
    match existing {
        None => WriteDecision::Create,
        Some(text) if text == rendered => WriteDecision::Unchanged,
        Some(text) if policy.is_stale(text) => WriteDecision::Replace,
        Some(_) => WriteDecision::Preserve,
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
    pub policy: WritePolicy,
}

/// Target file of `kind`, for generated and patched artifacts alike.
pub fn artifact_path(kind: ArtifactKind, ctx: &ArtifactContext<'_>) -> PathBuf {
    use ArtifactKind as K;

    let name = ctx.name();
    let plural = ctx.plural();
    let feature = ctx.feature_root();
    let persistence = ctx.layout.persistence();
    let application = ctx.layout.application();
    let command = |action: &str| feature.join("Commands").join(action);
    let query = |action: &str| feature.join("Queries").join(action);
    let constants = feature.join("Constants");
    let locales = feature.join("Resources").join("Locales");
    let locale_stem = ctx.entity.plural_field_name().to_lowercase();

    match kind {
        K::Entity => ctx.layout.entity_file(name),
        K::EntityConfiguration => persistence
            .join("EntityConfigurations")
            .join(format!("{name}Configuration.cs")),
        K::RepositoryInterface => application
            .join("Services")
            .join("Repositories")
            .join(format!("I{name}Repository.cs")),
        K::RepositoryImplementation => persistence
            .join("Repositories")
            .join(format!("{name}Repository.cs")),
        K::RepositoryRegistration => persistence.join("PersistenceServiceRegistration.cs"),
        K::DbContext => ctx.layout.contexts_dir().join(format!("{}.cs", ctx.db_context)),
        K::CreateCommand => command("Create").join(format!("Create{name}Command.cs")),
        K::CreatedResponse => command("Create").join(format!("Created{name}Response.cs")),
        K::CreateValidator => command("Create").join(format!("Create{name}CommandValidator.cs")),
        K::UpdateCommand => command("Update").join(format!("Update{name}Command.cs")),
        K::UpdatedResponse => command("Update").join(format!("Updated{name}Response.cs")),
        K::UpdateValidator => command("Update").join(format!("Update{name}CommandValidator.cs")),
        K::DeleteCommand => command("Delete").join(format!("Delete{name}Command.cs")),
        K::DeletedResponse => command("Delete").join(format!("Deleted{name}Response.cs")),
        K::GetByIdQuery => query("GetById").join(format!("GetById{name}Query.cs")),
        K::GetByIdResponse => query("GetById").join(format!("GetById{name}Response.cs")),
        K::GetListQuery => query("GetList").join(format!("GetList{name}Query.cs")),
        K::GetListItemDto => query("GetList").join(format!("GetList{name}ListItemDto.cs")),
        K::OperationClaims => constants.join(format!("{plural}OperationClaims.cs")),
        K::Messages => constants.join(format!("{plural}Messages.cs")),
        K::EnglishResources => locales.join(format!("{locale_stem}.en.yaml")),
        K::TurkishResources => locales.join(format!("{locale_stem}.tr.yaml")),
        K::BusinessRules => feature.join("Rules").join(format!("{name}BusinessRules.cs")),
        K::MappingProfiles => feature.join("Profiles").join("MappingProfiles.cs"),
        K::ServiceInterface => ctx.service_folder().join(format!("I{name}Service.cs")),
        K::ServiceManager => ctx.service_folder().join(format!("{name}Manager.cs")),
        K::ServiceRegistration => application.join("ApplicationServiceRegistration.cs"),
        K::Controller => ctx
            .layout
            .web_api()
            .join("Controllers")
            .join(format!("{plural}Controller.cs")),
        K::OperationClaimSeed => persistence
            .join("EntityConfigurations")
            .join(OPERATION_CLAIM_SEED_FILE),
    }
}

/// Policy for a generated (non-patch) artifact.
pub fn write_policy(kind: ArtifactKind, ctx: &ArtifactContext<'_>) -> WritePolicy {
    use ArtifactKind as K;

    let project = ctx.project();
    let name = ctx.name();
    let plural = ctx.plural();
    let stale = WritePolicy::ReplaceIfStale;

    match kind {
        K::RepositoryInterface => stale(vec![
            "global::".into(),
            format!("IAsyncRepository<{project}.Domain.Entities.{name}"),
            format!("IRepository<{project}.Domain.Entities.{name}"),
            format!("IAsyncRepository<{name},"),
            format!("IRepository<{name},"),
        ]),
        K::RepositoryImplementation => stale(vec![
            "global::".into(),
            format!("EfRepositoryBase<{project}.Domain.Entities.{name}"),
            format!("EfRepositoryBase<{name}, {}", ctx.id_type()),
        ]),
        K::CreatedResponse => stale(vec!["Commands.Creates".into()]),
        K::UpdatedResponse => stale(vec!["Commands.Updates".into()]),
        K::BusinessRules => stale(vec!["Core.CrossCuttingConcerns.Exceptions".into()]),
        K::ServiceInterface | K::ServiceManager => stale(vec![
            "global::".into(),
            format!("namespace {project}.Application.Services.{plural};"),
        ]),
        _ => WritePolicy::CreateOnce,
    }
}

/// Render `kind`. `None` for patch artifacts and for permission constants
/// when security is off.
pub fn render(kind: ArtifactKind, ctx: &ArtifactContext<'_>) -> Option<RenderedArtifact> {
    use ArtifactKind as K;

    let content = match kind {
        K::Entity => entity::render_entity(ctx),
        K::EntityConfiguration => persistence::render_configuration(ctx),
        K::RepositoryInterface => persistence::render_repository_interface(ctx),
        K::RepositoryImplementation => persistence::render_repository(ctx),
        K::CreateCommand => application::render_create_command(ctx),
        K::CreatedResponse => application::render_response(ctx, "Commands.Create", "Created"),
        K::CreateValidator => application::render_validator(ctx, "Create"),
        K::UpdateCommand => application::render_update_command(ctx),
        K::UpdatedResponse => application::render_response(ctx, "Commands.Update", "Updated"),
        K::UpdateValidator => application::render_validator(ctx, "Update"),
        K::DeleteCommand => application::render_delete_command(ctx),
        K::DeletedResponse => application::render_deleted_response(ctx),
        K::GetByIdQuery => application::render_get_by_id_query(ctx),
        K::GetByIdResponse => application::render_response(ctx, "Queries.GetById", "GetById"),
        K::GetListQuery => application::render_get_list_query(ctx),
        K::GetListItemDto => application::render_list_item_dto(ctx),
        K::OperationClaims if ctx.enable_security => application::render_operation_claims(ctx),
        K::OperationClaims => return None,
        K::Messages => application::render_messages(ctx),
        K::EnglishResources => application::render_resource(ctx, "not found."),
        K::TurkishResources => application::render_resource(ctx, "bulunamad."),
        K::BusinessRules => application::render_business_rules(ctx),
        K::MappingProfiles => application::render_mapping_profiles(ctx),
        K::ServiceInterface => services::render_service_interface(ctx),
        K::ServiceManager => services::render_service_manager(ctx),
        K::Controller => web::render_controller(ctx),
        K::RepositoryRegistration | K::DbContext | K::ServiceRegistration | K::OperationClaimSeed => {
            return None;
        }
    };

    Some(RenderedArtifact {
        kind,
        path: artifact_path(kind, ctx),
        content,
        policy: write_policy(kind, ctx),
    })
}

// ── Shared class-body fragments ──────────────────────────────────────────────

/// Property declarations, one per line.
fn push_properties(sb: &mut SourceBuilder, properties: &[PropertyDefinition]) {
    sb.lines(properties.iter().map(PropertyDefinition::declaration));
}

/// Parameterless constructor; only text members get a default.
fn push_default_constructor(sb: &mut SourceBuilder, class: &str, properties: &[PropertyDefinition]) {
    sb.line(format!("    public {class}()")).line("    {");
    for prop in properties.iter().filter(|p| p.is_text()) {
        sb.line(format!("        {} = string.Empty;", prop.name()));
    }
    sb.line("    }");
}

/// Constructor assigning every member from a parameter, optionally led by
/// `id`.
fn push_assigning_constructor(
    sb: &mut SourceBuilder,
    class: &str,
    id_type: Option<&str>,
    properties: &[PropertyDefinition],
) {
    let mut params: Vec<String> = id_type.map(|ty| format!("{ty} id")).into_iter().collect();
    params.extend(
        properties
            .iter()
            .map(|p| format!("{} {}", p.declared_type(), p.field_name())),
    );

    sb.line(format!("    public {class}({})", params.join(", ")))
        .line("    {");
    if id_type.is_some() {
        sb.line("        Id = id;");
    }
    for prop in properties {
        sb.line(format!("        {} = {};", prop.name(), prop.field_name()));
    }
    sb.line("    }");
}
