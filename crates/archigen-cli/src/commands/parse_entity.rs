//! `archigen parse-entity`: show what the parser recovers from a `.cs` file.

use archigen_core::{application::ApplicationError, domain::EntityParser};

use crate::{
    cli::ParseEntityArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: ParseEntityArgs, output: OutputManager) -> CliResult<()> {
    if !args.file.is_file() {
        return Err(CliError::Core(
            ApplicationError::MissingDependency {
                path: args.file,
                what: "entity file".into(),
            }
            .into(),
        ));
    }

    let source = std::fs::read_to_string(&args.file)
        .with_cli_context(|| format!("reading {}", args.file.display()))?;
    let entity = EntityParser::parse(&args.file.display().to_string(), &source)
        .map_err(|e| CliError::Core(e.into()))?;

    if output.is_json() {
        return output.json(&entity);
    }

    output.header(&format!("{} (id: {})", entity.name(), entity.id_type()))?;
    if entity.properties().is_empty() {
        output.print("  no properties")?;
    }
    let width = entity
        .properties()
        .iter()
        .map(|p| p.declared_type().len())
        .max()
        .unwrap_or(0);
    for prop in entity.properties() {
        output.print(&format!("  {:<width$}  {}", prop.declared_type(), prop.name()))?;
    }
    Ok(())
}
