//! `archigen crud`: generate the artifact set for one entity.

use std::sync::Arc;

use tracing::{info, instrument};

use archigen_adapters::LocalFilesystem;
use archigen_core::{
    application::CrudService,
    domain::{DomainValidator, GenerationOptions},
};

use crate::{
    cli::{CrudArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project, entity = %args.entity))]
pub fn execute(
    args: CrudArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let layout = super::resolve_layout(&global, &config, &args.project)?;
    let options = build_options(&args, &config)?;

    output.header(&format!(
        "Generating {} in {}",
        options.entity_name,
        layout.solution_root().display()
    ))?;

    let service = CrudService::new(Arc::new(LocalFilesystem::new()));
    let report = service.generate(&layout, &options)?;

    info!(written = report.written(), "crud finished");

    if output.is_json() {
        output.json(&report)?;
    } else {
        output.report(&report, layout.solution_root())?;
        output.print("")?;
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::PartialFailure {
            failed,
            total: report.entries().len(),
        });
    }

    output.success(&format!(
        "{} ready ({} files written)",
        report.entity(),
        report.written()
    ))?;
    Ok(())
}

/// Flags over config over defaults.
fn build_options(args: &CrudArgs, config: &AppConfig) -> CliResult<GenerationOptions> {
    let properties = match args.props.as_deref() {
        Some(spec) => DomainValidator::parse_properties(spec, Some(&args.entity))
            .map_err(|e| CliError::Core(e.into()))?,
        None => Vec::new(),
    };

    Ok(GenerationOptions::new(&args.project, &args.entity)
        .with_db_context(
            args.db_context
                .clone()
                .unwrap_or_else(|| config.generation.db_context.clone()),
        )
        .with_id_type(
            args.id_type
                .clone()
                .unwrap_or_else(|| config.generation.id_type.clone()),
        )
        .with_properties(properties)
        .with_security(args.security || config.generation.enable_security))
}
