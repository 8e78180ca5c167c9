//! `archigen config`: read and write configuration values.
//!
//! `get` and `list` show the effective values (file, environment and
//! defaults merged). `set` edits only the file layer.

use std::path::PathBuf;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            if output.is_json() {
                output.json(&serde_json::json!({ "key": key, "value": value }))?;
            } else {
                output.print(&value)?;
            }
        }

        ConfigCommands::Set { key, value } => {
            let path = config_file(&global);
            let mut stored = AppConfig::read_file(&path)?;
            stored.set(&key, &value)?;
            stored.save(&path)?;
            output.success(&format!("{key} = {value:?} ({})", path.display()))?;
        }

        ConfigCommands::List => {
            let entries = config.entries();
            if output.is_json() {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect();
                output.json(&map)?;
            } else {
                output.header("Current configuration:")?;
                for (key, value) in entries {
                    output.print(&format!("  {key:<28} = {value:?}"))?;
                }
            }
        }

        ConfigCommands::Path => {
            // Printed even with --quiet.
            println!("{}", config_file(&global).display());
        }
    }

    Ok(())
}

fn config_file(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::config_path)
}
