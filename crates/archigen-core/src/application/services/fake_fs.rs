//! Minimal in-memory [`Filesystem`] for service unit tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::ArchigenResult,
};

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    writes: usize,
}

#[derive(Debug, Default)]
pub struct FakeFilesystem {
    state: Mutex<State>,
}

impl FakeFilesystem {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Arc<Self> {
        let fs = Self::new();
        for (path, text) in files {
            fs.seed(path, text);
        }
        fs
    }

    /// Add a file without counting it as a write.
    pub fn seed(&self, path: impl AsRef<Path>, text: &str) {
        let mut state = self.state.lock().unwrap();
        let path = path.as_ref();
        add_ancestors(&mut state.dirs, path.parent());
        state.files.insert(path.to_path_buf(), text.to_string());
    }

    pub fn mkdir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        add_ancestors(&mut state.dirs, Some(path.as_ref()));
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

fn add_ancestors(dirs: &mut BTreeSet<PathBuf>, path: Option<&Path>) {
    if let Some(path) = path {
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
    }
}

impl Filesystem for FakeFilesystem {
    fn create_dir_all(&self, path: &Path) -> ArchigenResult<()> {
        self.mkdir(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ArchigenResult<()> {
        let mut state = self.state.lock().map_err(|_| ApplicationError::LockPoisoned)?;
        add_ancestors(&mut state.dirs, path.parent());
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes += 1;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ArchigenResult<String> {
        self.read(path)
            .ok_or_else(|| ApplicationError::filesystem(path, "not found").into())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    fn list_dir(&self, path: &Path) -> ArchigenResult<Vec<DirEntry>> {
        let state = self.state.lock().unwrap();
        let child = |p: &PathBuf, is_dir: bool| {
            (p.parent() == Some(path)).then(|| DirEntry {
                path: p.clone(),
                name: p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                is_dir,
            })
        };
        let mut entries: Vec<DirEntry> = state
            .dirs
            .iter()
            .filter_map(|d| child(d, true))
            .chain(state.files.keys().filter_map(|f| child(f, false)))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn rename(&self, from: &Path, to: &Path) -> ArchigenResult<()> {
        let mut state = self.state.lock().unwrap();
        let moved = |p: &PathBuf| to.join(p.strip_prefix(from).unwrap_or(p));

        let files: Vec<_> = state
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(from))
            .map(|(p, t)| (p.clone(), t.clone()))
            .collect();
        for (path, text) in files {
            state.files.remove(&path);
            state.files.insert(moved(&path), text);
        }

        let dirs: Vec<_> = state.dirs.iter().filter(|d| d.starts_with(from)).cloned().collect();
        for dir in dirs {
            state.dirs.remove(&dir);
            state.dirs.insert(moved(&dir));
        }
        add_ancestors(&mut state.dirs, to.parent());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ArchigenResult<()> {
        let mut state = self.state.lock().unwrap();
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|d| !d.starts_with(path));
        Ok(())
    }
}
