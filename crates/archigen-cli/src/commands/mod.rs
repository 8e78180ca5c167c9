//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and render the result.
//! No business logic lives here.

use std::path::PathBuf;

use console::Term;
use owo_colors::OwoColorize;

use archigen_adapters::{ProcessToolRunner, Stream};
use archigen_core::domain::ProjectLayout;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub mod add_property;
pub mod completions;
pub mod config;
pub mod crud;
pub mod layout;
pub mod migrate;
pub mod new;
pub mod parse_entity;

/// `--solution`, then `generation.solution_root`, then the current directory.
pub fn solution_root(global: &GlobalArgs, config: &AppConfig) -> CliResult<PathBuf> {
    let root = match global
        .solution
        .clone()
        .or_else(|| config.generation.solution_root.clone())
    {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    if !root.is_dir() {
        return Err(CliError::SolutionNotFound { path: root });
    }
    Ok(root)
}

/// Layout of `project` under the resolved solution root.
pub fn resolve_layout(
    global: &GlobalArgs,
    config: &AppConfig,
    project: &str,
) -> CliResult<ProjectLayout> {
    let root = solution_root(global, config)?;
    ProjectLayout::new(root, project).map_err(|e| CliError::Core(e.into()))
}

/// Process runner that echoes tool output to stderr unless quiet.
pub fn tool_runner(output: &OutputManager) -> ProcessToolRunner {
    if output.is_quiet() {
        return ProcessToolRunner::new();
    }
    let color = output.supports_color();
    let term = Term::stderr();
    ProcessToolRunner::with_sink(move |stream, line| {
        let line = match stream {
            Stream::Stderr if color => format!("  {}", line.yellow()),
            _ if color => format!("  {}", line.dimmed()),
            _ => format!("  {line}"),
        };
        // A closed stderr must not abort the tool.
        let _ = term.write_line(&line);
    })
}
