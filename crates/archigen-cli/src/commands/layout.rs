//! `archigen layout`: where each layer project lives.

use std::path::PathBuf;

use serde::Serialize;

use archigen_core::domain::{Layer, ProjectLayout};

use crate::{
    cli::LayoutArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct LayerRow {
    layer: Layer,
    namespace: String,
    path: PathBuf,
    exists: bool,
}

pub fn execute(args: LayoutArgs, output: OutputManager) -> CliResult<()> {
    let layout = ProjectLayout::new(&args.solution_root, &args.project)
        .map_err(|e| CliError::Core(e.into()))?;
    let rows = rows(&layout);

    if output.is_json() {
        return output.json(&rows);
    }

    output.header(&format!(
        "{} at {}",
        layout.project_name(),
        layout.project_root().display()
    ))?;
    for row in &rows {
        let line = format!("{:<16} {}", row.namespace, row.path.display());
        if row.exists {
            output.success(&line)?;
        } else {
            output.warning(&format!("{line} (missing)"))?;
        }
    }
    Ok(())
}

fn rows(layout: &ProjectLayout) -> Vec<LayerRow> {
    Layer::ALL
        .iter()
        .map(|&layer| {
            let path = layout.layer_path(layer);
            LayerRow {
                layer,
                namespace: layout.namespace(layer),
                exists: path.is_dir(),
                path,
            }
        })
        .collect()
}
