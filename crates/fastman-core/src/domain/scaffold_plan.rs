use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::error::DomainError;

/// What happens when a planned file already exists on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Leave the existing file alone and report it as skipped.
    #[default]
    Create,
    /// Replace the existing file.
    Overwrite,
}

/// Ordered directories and files to materialise under `root`.
///
/// All entry paths are relative to `root`. Plans are pure data; writing them
/// is the scaffold service's job.
#[derive(Debug, Clone)]
pub struct ScaffoldPlan {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<PlanEntry>,
}

impl ScaffoldPlan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    /// Plain directory.
    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(PlanEntry::Directory(DirectoryToCreate {
            path: path.into(),
            python_package: false,
        }));
    }

    /// Directory that also receives an empty `__init__.py`.
    pub fn add_package(&mut self, path: impl Into<PathBuf>) {
        self.entries.push(PlanEntry::Directory(DirectoryToCreate {
            path: path.into(),
            python_package: true,
        }));
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.push_file(path.into(), content.into(), WriteMode::Create);
    }

    pub fn add_file_overwriting(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.push_file(path.into(), content.into(), WriteMode::Overwrite);
    }

    pub fn with_package(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_package(path);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::Precondition {
                message: "Nothing to generate".into(),
                hint: None,
            });
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let path = entry.path();
            if path.is_absolute() || path.components().any(|c| c.as_os_str() == "..") {
                return Err(DomainError::InvalidName {
                    name: path.display().to_string(),
                    reason: "Generated paths must stay inside the project".into(),
                });
            }
            if !seen.insert(path.to_path_buf()) {
                return Err(DomainError::Precondition {
                    message: format!("Duplicate path in plan: {}", path.display()),
                    hint: None,
                });
            }
        }

        Ok(())
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::File(f) => Some(f),
            PlanEntry::Directory(_) => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|e| match e {
            PlanEntry::Directory(d) => Some(d),
            PlanEntry::File(_) => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn push_file(&mut self, path: PathBuf, content: String, mode: WriteMode) {
        self.entries.push(PlanEntry::File(FileToWrite {
            path,
            content,
            mode,
        }));
    }
}

#[derive(Debug, Clone)]
pub enum PlanEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl PlanEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
    pub mode: WriteMode,
}

#[derive(Debug, Clone)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
    pub python_package: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_is_invalid() {
        assert!(ScaffoldPlan::new("x").validate().is_err());
    }

    #[test]
    fn duplicate_paths_are_invalid() {
        let plan = ScaffoldPlan::new("x")
            .with_file("a.py", "")
            .with_file("a.py", "again");
        assert!(plan.validate().is_err());
    }

    #[test]
    fn escaping_paths_are_invalid() {
        let plan = ScaffoldPlan::new("x").with_file("../evil.py", "");
        assert!(matches!(
            plan.validate(),
            Err(DomainError::InvalidName { .. })
        ));
    }

    #[test]
    fn iterators_split_entries() {
        let plan = ScaffoldPlan::new("x")
            .with_package("app")
            .with_directory("logs")
            .with_file("app/main.py", "print()");
        assert!(plan.validate().is_ok());
        assert_eq!(plan.files().count(), 1);
        assert_eq!(plan.directories().count(), 2);
        assert_eq!(plan.entry_count(), 3);
        assert!(plan.directories().next().is_some_and(|d| d.python_package));
    }
}
