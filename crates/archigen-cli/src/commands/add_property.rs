//! `archigen add-property`: extend an existing entity and its artifacts.

use std::sync::Arc;

use tracing::{info, instrument};

use archigen_adapters::LocalFilesystem;
use archigen_core::application::PropertyService;

use crate::{
    cli::{AddPropertyArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(entity = %args.entity, property = %args.name))]
pub fn execute(
    args: AddPropertyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let layout = super::resolve_layout(&global, &config, &args.project)?;

    output.header(&format!(
        "Adding {} {} to {}",
        args.property_type, args.name, args.entity
    ))?;

    let service = PropertyService::new(Arc::new(LocalFilesystem::new()));
    let report = service.add_property(&layout, &args.entity, &args.name, &args.property_type)?;

    info!(written = report.written(), "add-property finished");

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

    if report.written() == 0 {
        output.info(&format!("{} already has {}", report.entity(), args.name))?;
    } else {
        output.success(&format!("{} added to {}", args.name, report.entity()))?;
    }
    Ok(())
}
