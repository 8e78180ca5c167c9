//! Build-tool conveniences: restore, build and EF Core migrations.
//!
//! Never used by generation or patching. Every invocation goes through the
//! [`ToolRunner`] port.

use std::{path::Path, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ToolCommand, ToolOutput, ToolRunner},
    },
    domain::{Layer, ProjectLayout},
    error::ArchigenResult,
};

const DOTNET: &str = "dotnet";

pub struct ToolService {
    runner: Arc<dyn ToolRunner>,
    filesystem: Arc<dyn Filesystem>,
}

impl ToolService {
    pub fn new(runner: Arc<dyn ToolRunner>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self { runner, filesystem }
    }

    /// `dotnet restore` in `root`.
    pub fn restore(&self, root: &Path) -> ArchigenResult<ToolOutput> {
        self.run(root, ToolCommand::new(DOTNET, ["restore"]))
    }

    /// `dotnet build <Project>.sln` in `root`.
    pub fn build(&self, root: &Path, project_name: &str) -> ArchigenResult<ToolOutput> {
        self.run(
            root,
            ToolCommand::new(DOTNET, ["build".to_string(), format!("{project_name}.sln")]),
        )
    }

    /// DbContext classes under `Persistence/Contexts` and the Persistence
    /// project root, by file stem.
    pub fn list_db_contexts(&self, layout: &ProjectLayout) -> ArchigenResult<Vec<String>> {
        let mut contexts: Vec<String> = Vec::new();

        for dir in [layout.contexts_dir(), layout.persistence()] {
            if !self.filesystem.is_dir(&dir) {
                continue;
            }
            for entry in self.filesystem.list_dir(&dir)? {
                let Some(stem) = entry.name.strip_suffix(".cs") else {
                    continue;
                };
                if entry.is_dir || !stem.ends_with("Context") || contexts.iter().any(|c| c == stem) {
                    continue;
                }
                let text = self.filesystem.read_to_string(&entry.path)?;
                if text.contains(": DbContext") || text.contains(":DbContext") {
                    contexts.push(stem.to_string());
                }
            }
        }

        Ok(contexts)
    }

    /// Pick the DbContext for a migration.
    ///
    /// A requested name must exist. Without one, a single context is used
    /// as is; several are an error listing the choices.
    pub fn select_db_context(
        &self,
        layout: &ProjectLayout,
        requested: Option<&str>,
    ) -> ArchigenResult<String> {
        let contexts = self.list_db_contexts(layout)?;
        if contexts.is_empty() {
            return Err(ApplicationError::MissingDependency {
                path: layout.contexts_dir(),
                what: "DbContext class".into(),
            }
            .into());
        }

        match requested {
            Some(name) if contexts.iter().any(|c| c == name) => Ok(name.to_string()),
            Some(name) => Err(ApplicationError::ValidationFailed(format!(
                "DbContext '{name}' not found; available: {}",
                contexts.join(", ")
            ))
            .into()),
            None if contexts.len() == 1 => Ok(contexts[0].clone()),
            None => Err(ApplicationError::ValidationFailed(format!(
                "several DbContexts found, choose one with --context: {}",
                contexts.join(", ")
            ))
            .into()),
        }
    }

    /// `dotnet ef migrations add <name> --context <ctx> --project … --startup-project …`.
    #[instrument(skip_all, fields(migration = %name, context = %context))]
    pub fn add_migration(
        &self,
        layout: &ProjectLayout,
        name: &str,
        context: &str,
    ) -> ArchigenResult<ToolOutput> {
        let mut args = vec!["ef", "migrations", "add", name]
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        args.extend(ef_project_args(layout, context));
        self.run(layout.solution_root(), ToolCommand::new(DOTNET, args))
    }

    /// `dotnet ef database update --context <ctx> --project … --startup-project …`.
    #[instrument(skip_all, fields(context = %context))]
    pub fn update_database(&self, layout: &ProjectLayout, context: &str) -> ArchigenResult<ToolOutput> {
        let mut args = vec!["ef".to_string(), "database".into(), "update".into()];
        args.extend(ef_project_args(layout, context));
        self.run(layout.solution_root(), ToolCommand::new(DOTNET, args))
    }

    fn run(&self, dir: &Path, command: ToolCommand) -> ArchigenResult<ToolOutput> {
        info!(dir = %dir.display(), command = %command, "Running");
        let output = self.runner.run(dir, &command)?;
        if !output.success {
            warn!(command = %command, "Command failed");
            return Err(ApplicationError::ToolFailed {
                command: command.to_string(),
                stderr: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(output)
    }
}

fn ef_project_args(layout: &ProjectLayout, context: &str) -> Vec<String> {
    let project_file = |layer: Layer| {
        layout
            .layer_path(layer)
            .join(format!("{}.csproj", layout.namespace(layer)))
            .display()
            .to_string()
    };

    vec![
        "--context".into(),
        context.to_string(),
        "--project".into(),
        project_file(Layer::Persistence),
        "--startup-project".into(),
        project_file(Layer::WebApi),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockToolRunner;
    use crate::application::services::fake_fs::FakeFilesystem;
    use crate::error::ArchigenError;

    fn layout() -> ProjectLayout {
        ProjectLayout::new("/w", "Shop").unwrap()
    }

    fn ok() -> ToolOutput {
        ToolOutput {
            success: true,
            ..ToolOutput::default()
        }
    }

    #[test]
    fn migration_command_line() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|dir, cmd| {
                dir == Path::new("/w")
                    && cmd.to_string()
                        == "dotnet ef migrations add AddProduct --context BaseDbContext \
                            --project /w/project/Shop.Persistence/Shop.Persistence.csproj \
                            --startup-project /w/project/Shop.WebAPI/Shop.WebAPI.csproj"
            })
            .times(1)
            .returning(|_, _| Ok(ok()));

        let service = ToolService::new(Arc::new(runner), FakeFilesystem::new());
        service
            .add_migration(&layout(), "AddProduct", "BaseDbContext")
            .unwrap();
    }

    #[test]
    fn failure_carries_stderr() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|dir, _| dir == Path::new("/w"))
            .returning(|_, _| {
                Ok(ToolOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: "error NU1101\n".into(),
                })
            });

        let service = ToolService::new(Arc::new(runner), FakeFilesystem::new());
        match service.restore(Path::new("/w")).unwrap_err() {
            ArchigenError::Application(ApplicationError::ToolFailed { command, stderr }) => {
                assert_eq!(command, "dotnet restore");
                assert_eq!(stderr, "error NU1101");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn db_context_selection() {
        let layout = layout();
        let fs = FakeFilesystem::new();
        fs.seed(
            layout.contexts_dir().join("BaseDbContext.cs"),
            "public class BaseDbContext : DbContext {}",
        );
        fs.seed(
            layout.contexts_dir().join("Helpers.cs"),
            "public static class Helpers {}",
        );
        let service = ToolService::new(Arc::new(MockToolRunner::new()), fs.clone());

        assert_eq!(service.list_db_contexts(&layout).unwrap(), vec!["BaseDbContext"]);
        assert_eq!(service.select_db_context(&layout, None).unwrap(), "BaseDbContext");

        fs.seed(
            layout.persistence().join("AuditContext.cs"),
            "public class AuditContext :DbContext {}",
        );
        let err = service.select_db_context(&layout, None).unwrap_err();
        assert!(err.to_string().contains("BaseDbContext, AuditContext"));
        assert_eq!(
            service.select_db_context(&layout, Some("AuditContext")).unwrap(),
            "AuditContext"
        );
        assert!(service.select_db_context(&layout, Some("Other")).is_err());
    }

    #[test]
    fn no_context_is_missing_dependency() {
        let service = ToolService::new(Arc::new(MockToolRunner::new()), FakeFilesystem::new());
        assert!(matches!(
            service.select_db_context(&layout(), None),
            Err(ArchigenError::Application(ApplicationError::MissingDependency { .. }))
        ));
    }
}
