//! Implementation of the `archigen new` command.
//!
//! Responsibility: locate the project template, copy it under the new name,
//! then restore and build the solution unless `--no-restore` is given.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use archigen_adapters::{LocalFilesystem, TemplateSearch};
use archigen_core::application::ToolService;

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `archigen new` command.
///
/// 1. Resolve the destination (`--output` or the current directory, plus NAME)
/// 2. Find the template
/// 3. Confirm before writing into a non-empty directory
/// 4. Instantiate it behind a spinner
/// 5. `dotnet restore` + `dotnet build` unless `--no-restore`
/// 6. Print next steps
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let destination = destination(args.output.as_deref(), &args.name)?;
    let template = TemplateSearch::from_env(config.templates.path.clone()).find()?;
    info!(template = %template.root().display(), "Using template");

    let force = args.force || confirm_overwrite(&destination, &output)?;

    output.header(&format!("Creating '{}'...", args.name))?;

    let spinner = output.spinner(&format!("Copying template to {}", destination.display()));
    let result = template.instantiate(&args.name, &destination, force);
    spinner.finish_and_clear();
    let instance = result?;

    output.success(&format!(
        "Solution '{}' created at {} ({} files rewritten, {} copied)",
        args.name,
        instance.destination.display(),
        instance.rewritten,
        instance.copied
    ))?;

    if !args.no_restore {
        let tools = ToolService::new(
            Arc::new(super::tool_runner(&output)),
            Arc::new(LocalFilesystem::new()),
        );
        output.info("Restoring packages...")?;
        tools.restore(&instance.destination)?;
        output.info("Building...")?;
        tools.build(&instance.destination, &args.name)?;
        output.success("Build succeeded")?;
    }

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", instance.destination.display()))?;
        output.print(&format!(
            "  archigen crud {} Product --props \"Name:string,Price:decimal\"",
            args.name
        ))?;
    }

    Ok(())
}

/// Ask before writing into a non-empty directory. Declining cancels.
fn confirm_overwrite(destination: &Path, output: &OutputManager) -> CliResult<bool> {
    let occupied = std::fs::read_dir(destination)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if !occupied || !output.can_prompt() {
        return Ok(false);
    }
    let prompt = format!("{} is not empty. Overwrite template files?", destination.display());
    if output.confirm(&prompt, false)? {
        Ok(true)
    } else {
        Err(CliError::Cancelled)
    }
}

fn destination(output_dir: Option<&Path>, name: &str) -> CliResult<PathBuf> {
    let parent = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(parent.join(name))
}
