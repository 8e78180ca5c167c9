//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use archigen_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::{ArchigenError, ArchigenResult},
};

/// Production filesystem implementation using `std::fs`.
///
/// Writes go to a temporary file next to the target and are then renamed
/// over it, so a reader sees either the old or the new content.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ArchigenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ArchigenResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|e| map_io_error(path, e, "create temp file"))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        // Keep the mode of the file being replaced.
        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| map_io_error(path, e, "copy permissions"))?;
        }
        tmp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ArchigenResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> ArchigenResult<Vec<DirEntry>> {
        let reader = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;

        let mut entries = Vec::new();
        for entry in reader {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| map_io_error(&entry.path(), e, "get metadata"))?
                .is_dir();
            entries.push(DirEntry {
                path: entry.path(),
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> ArchigenResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_dir_all(&self, path: &Path) -> ArchigenResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ArchigenError {
    ApplicationError::filesystem(path, format!("failed to {operation}: {e}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/File.cs");
        let fs = LocalFilesystem::new();

        fs.write_file(&path, "one").unwrap();
        fs.write_file(&path, "two").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "two");
        // no temp files left next to the target
        assert_eq!(fs.list_dir(&dir.path().join("a/b")).unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn replace_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Product.cs");
        std::fs::write(&path, "one").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        LocalFilesystem::new().write_file(&path, "two").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn list_is_sorted() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        fs.write_file(&dir.path().join("b.cs"), "").unwrap();
        fs.write_file(&dir.path().join("a.cs"), "").unwrap();
        fs.create_dir_all(&dir.path().join("c")).unwrap();

        let names: Vec<_> = fs
            .list_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| (e.name, e.is_dir))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a.cs".to_string(), false),
                ("b.cs".to_string(), false),
                ("c".to_string(), true)
            ]
        );
    }

    #[test]
    fn missing_file_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&dir.path().join("nope.cs"))
            .unwrap_err();
        assert!(matches!(
            err,
            ArchigenError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
