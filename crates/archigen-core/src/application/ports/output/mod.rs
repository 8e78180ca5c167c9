//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `archigen-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ArchigenResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `archigen_adapters::filesystem::LocalFilesystem` (production)
/// - `archigen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `write_file` replaces the whole file; implementations must never leave
///   a half-written file behind
/// - Paths are absolute, built from a `ProjectLayout`
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ArchigenResult<()>;

    /// Replace the file's content, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> ArchigenResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> ArchigenResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Immediate children of a directory, sorted by name.
    fn list_dir(&self, path: &Path) -> ArchigenResult<Vec<DirEntry>>;

    /// Move a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> ArchigenResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ArchigenResult<()>;
}

/// An external command line, e.g. `dotnet ef database update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Port for running the external build tool.
///
/// Implemented by:
/// - `archigen_adapters::tool_runner::ProcessToolRunner` (spawns the process,
///   streams its output as it arrives)
///
/// Never used by generation or patching; only by the restore, build and
/// migration conveniences in `ToolService`.
#[cfg_attr(test, mockall::automock)]
pub trait ToolRunner: Send + Sync {
    /// Run `command` in `working_dir` and wait for it to finish.
    ///
    /// A non-zero exit is reported through `ToolOutput::success`, not as an
    /// error; `Err` means the process could not be started at all.
    fn run(&self, working_dir: &Path, command: &ToolCommand) -> ArchigenResult<ToolOutput>;
}
