//! Domain value objects: Layer, ArtifactKind.
//!
//! Pure value types: `Copy`, equality-by-value, no identity. Their only job is
//! to name things and parse/print those names.

use crate::domain::error::DomainError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ── Layer ────────────────────────────────────────────────────────────────────

/// One architectural project under `project/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Layer {
    Application,
    Domain,
    Infrastructure,
    Persistence,
    WebApi,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Self::Application,
        Self::Domain,
        Self::Infrastructure,
        Self::Persistence,
        Self::WebApi,
    ];

    /// Suffix of the layer project, as in `<Project>.<suffix>`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Domain => "Domain",
            Self::Infrastructure => "Infrastructure",
            Self::Persistence => "Persistence",
            Self::WebApi => "WebAPI",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "application" | "app" => Ok(Self::Application),
            "domain" => Ok(Self::Domain),
            "infrastructure" | "infra" => Ok(Self::Infrastructure),
            "persistence" => Ok(Self::Persistence),
            "webapi" | "web" | "api" => Ok(Self::WebApi),
            _ => Err(DomainError::UnknownLayer(s.to_string())),
        }
    }
}

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// Every file the generator writes or patches for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Entity,
    EntityConfiguration,
    RepositoryInterface,
    RepositoryImplementation,
    RepositoryRegistration,
    DbContext,
    CreateCommand,
    CreatedResponse,
    CreateValidator,
    UpdateCommand,
    UpdatedResponse,
    UpdateValidator,
    DeleteCommand,
    DeletedResponse,
    GetByIdQuery,
    GetByIdResponse,
    GetListQuery,
    GetListItemDto,
    OperationClaims,
    Messages,
    EnglishResources,
    TurkishResources,
    BusinessRules,
    MappingProfiles,
    ServiceInterface,
    ServiceManager,
    ServiceRegistration,
    Controller,
    OperationClaimSeed,
}

impl ArtifactKind {
    /// Every artifact, in generation order.
    pub const ALL: [ArtifactKind; 29] = [
        Self::Entity,
        Self::EntityConfiguration,
        Self::RepositoryInterface,
        Self::RepositoryImplementation,
        Self::RepositoryRegistration,
        Self::DbContext,
        Self::CreateCommand,
        Self::CreatedResponse,
        Self::CreateValidator,
        Self::UpdateCommand,
        Self::UpdatedResponse,
        Self::UpdateValidator,
        Self::DeleteCommand,
        Self::DeletedResponse,
        Self::GetByIdQuery,
        Self::GetByIdResponse,
        Self::GetListQuery,
        Self::GetListItemDto,
        Self::OperationClaims,
        Self::Messages,
        Self::EnglishResources,
        Self::TurkishResources,
        Self::BusinessRules,
        Self::MappingProfiles,
        Self::ServiceInterface,
        Self::ServiceManager,
        Self::ServiceRegistration,
        Self::Controller,
        Self::OperationClaimSeed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::EntityConfiguration => "entity-configuration",
            Self::RepositoryInterface => "repository-interface",
            Self::RepositoryImplementation => "repository",
            Self::RepositoryRegistration => "repository-registration",
            Self::DbContext => "db-context",
            Self::CreateCommand => "create-command",
            Self::CreatedResponse => "created-response",
            Self::CreateValidator => "create-validator",
            Self::UpdateCommand => "update-command",
            Self::UpdatedResponse => "updated-response",
            Self::UpdateValidator => "update-validator",
            Self::DeleteCommand => "delete-command",
            Self::DeletedResponse => "deleted-response",
            Self::GetByIdQuery => "get-by-id-query",
            Self::GetByIdResponse => "get-by-id-response",
            Self::GetListQuery => "get-list-query",
            Self::GetListItemDto => "get-list-item-dto",
            Self::OperationClaims => "operation-claims",
            Self::Messages => "messages",
            Self::EnglishResources => "resources-en",
            Self::TurkishResources => "resources-tr",
            Self::BusinessRules => "business-rules",
            Self::MappingProfiles => "mapping-profiles",
            Self::ServiceInterface => "service-interface",
            Self::ServiceManager => "service-manager",
            Self::ServiceRegistration => "service-registration",
            Self::Controller => "controller",
            Self::OperationClaimSeed => "operation-claim-seed",
        }
    }

    /// Whether this artifact is an edit to a shared file rather than a file
    /// owned by one entity.
    pub const fn is_patch(&self) -> bool {
        matches!(
            self,
            Self::RepositoryRegistration
                | Self::DbContext
                | Self::ServiceRegistration
                | Self::OperationClaimSeed
        )
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
