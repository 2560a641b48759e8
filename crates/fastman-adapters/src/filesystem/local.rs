//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use fastman_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{FastmanError, FastmanResult},
};
use tracing::warn;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> FastmanResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> FastmanResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> FastmanResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> FastmanResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> FastmanResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn walk(&self, root: &Path, prune: &[&str]) -> FastmanResult<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && prune.iter().any(|name| entry.file_name() == *name))
            });

        let mut paths = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => paths.push(entry.into_path()),
                Err(e) => {
                    let path = e.path().unwrap_or(root);
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                }
            }
        }
        Ok(paths)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> FastmanError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
