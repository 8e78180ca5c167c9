//! `archigen migrate`: add an EF Core migration, optionally apply it.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, instrument};

use archigen_adapters::LocalFilesystem;
use archigen_core::{
    application::ToolService,
    domain::{DomainValidator, ProjectLayout},
};

use crate::{
    cli::{GlobalArgs, MigrateArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project))]
pub fn execute(
    args: MigrateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let layout = super::resolve_layout(&global, &config, &args.project)?;
    let name = migration_name(args.name.as_deref())?;

    let tools = ToolService::new(
        Arc::new(super::tool_runner(&output)),
        Arc::new(LocalFilesystem::new()),
    );
    let context = choose_context(&tools, &layout, args.context.as_deref(), &output)?;

    output.header(&format!("Adding migration {name} ({context})"))?;
    tools.add_migration(&layout, &name, &context)?;
    output.success(&format!("Migration {name} added"))?;

    let update = args.update || output.confirm("Apply the migration to the database now?", false)?;
    if update {
        info!(context = %context, "Updating database");
        tools.update_database(&layout, &context)?;
        output.success("Database updated")?;
    }
    Ok(())
}

/// The given name, or `Migration<yyyyMMddHHmmss>`.
fn migration_name(requested: Option<&str>) -> CliResult<String> {
    let name = match requested {
        Some(name) => name.trim().to_string(),
        None => format!("Migration{}", Local::now().format("%Y%m%d%H%M%S")),
    };
    if !DomainValidator::is_valid_identifier(&name) {
        return Err(CliError::InvalidInput {
            message: format!("'{name}' is not a valid migration name"),
        });
    }
    Ok(name)
}

/// Without `--context`, ask when several contexts exist and a prompt is possible.
fn choose_context(
    tools: &ToolService,
    layout: &ProjectLayout,
    requested: Option<&str>,
    output: &OutputManager,
) -> CliResult<String> {
    match tools.select_db_context(layout, requested) {
        Ok(context) => Ok(context),
        Err(err) if requested.is_none() && err.is_validation() && output.can_prompt() => {
            let contexts = tools.list_db_contexts(layout)?;
            output
                .select("Which DbContext?", &contexts)?
                .and_then(|i| contexts.get(i).cloned())
                .ok_or(CliError::Core(err))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_timestamped() {
        let name = migration_name(None).unwrap();
        assert!(name.starts_with("Migration"));
        assert_eq!(name.len(), "Migration".len() + 14);
    }

    #[test]
    fn explicit_name_must_be_an_identifier() {
        assert_eq!(migration_name(Some(" AddProduct ")).unwrap(), "AddProduct");
        assert!(matches!(
            migration_name(Some("add product")),
            Err(CliError::InvalidInput { .. })
        ));
    }
}
