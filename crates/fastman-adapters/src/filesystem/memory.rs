//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::warn;

use fastman_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{FastmanError, FastmanResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can hand one clone to a
/// `Runtime` and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Writes to these paths fail.
    read_only: BTreeSet<PathBuf>,
    /// Directories whose listing fails during a walk.
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().ok()?.files.get(path.as_ref()).cloned()
    }

    /// Seed a file and its parent directories.
    pub fn insert_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_string());
        }
    }

    /// Make writes to `path` fail (for rollback tests).
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.write() {
            inner.read_only.insert(path.as_ref().to_path_buf());
        }
    }

    /// Make walks fail to list `path` (for walk error tests).
    pub fn fail_listing(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.write() {
            inner.unreadable.insert(path.as_ref().to_path_buf());
        }
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> FastmanResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> FastmanResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> FastmanError {
    FastmanError::internal("memory filesystem lock poisoned")
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> FastmanResult<()> {
        let mut inner = self.write()?;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FastmanResult<()> {
        let mut inner = self.write()?;

        if inner.read_only.contains(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Permission denied".into(),
            }
            .into());
        }

        // Ensure parent exists
        let parent_missing = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if parent_missing {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> FastmanResult<String> {
        self.read()?.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> FastmanResult<()> {
        let mut inner = self.write()?;
        inner.files.remove(path).map(|_| ()).ok_or_else(|| {
            ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn remove_dir_all(&self, path: &Path) -> FastmanResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn walk(&self, root: &Path, prune: &[&str]) -> FastmanResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let pruned = |p: &Path| {
            let relative = p.strip_prefix(root).unwrap_or(p);
            relative
                .components()
                .any(|c| prune.iter().any(|name| c.as_os_str() == *name))
        };

        for dir in inner.unreadable.iter().filter(|d| d.starts_with(root)) {
            warn!(path = %dir.display(), "skipping unreadable entry");
        }
        let below_unreadable = |p: &Path| {
            inner
                .unreadable
                .iter()
                .any(|d| p.starts_with(d) && p != d.as_path())
        };

        let mut paths: Vec<PathBuf> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .filter(|p| !pruned(p.as_path()) && !below_unreadable(p.as_path()))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }
}
