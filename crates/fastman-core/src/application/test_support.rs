//! In-crate fakes for the ports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::ApplicationError;
use super::ports::{Filesystem, MockProcessRunner, Reporter};
use crate::application::Runtime;
use crate::error::FastmanResult;

/// Reporter that records every message as `"<kind>: <msg>"`.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub answer: bool,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    fn push(&self, kind: &str, msg: &str) {
        self.messages.lock().unwrap().push(format!("{kind}: {msg}"));
    }
}

impl Reporter for RecordingReporter {
    fn line(&self, msg: &str) {
        self.push("line", msg);
    }
    fn header(&self, msg: &str) {
        self.push("header", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn success(&self, msg: &str) {
        self.push("success", msg);
    }
    fn warning(&self, msg: &str) {
        self.push("warning", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn confirm(&self, prompt: &str, _default: bool) -> bool {
        self.push("confirm", prompt);
        self.answer
    }
}

/// Map-backed filesystem. `None` entries are directories.
#[derive(Clone, Default)]
pub struct FakeFs {
    pub entries: Arc<Mutex<BTreeMap<PathBuf, Option<String>>>>,
    /// Writing this path fails.
    pub fail_on: Option<PathBuf>,
}

impl FakeFs {
    pub fn read(&self, path: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(Path::new(path))
            .cloned()
            .flatten()
    }

    pub fn seed_file(&self, path: &str, content: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), Some(content.to_string()));
    }

    pub fn has(&self, path: &str) -> bool {
        self.entries.lock().unwrap().contains_key(Path::new(path))
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> FastmanResult<()> {
        let mut entries = self.entries.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries.entry(ancestor.to_path_buf()).or_insert(None);
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> FastmanResult<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "injected failure".into(),
            }
            .into());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), Some(content.to_string()));
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> FastmanResult<String> {
        self.entries
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .flatten()
            .ok_or_else(|| {
                ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(None))
    }

    fn remove_file(&self, path: &Path) -> FastmanResult<()> {
        self.entries.lock().unwrap().remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> FastmanResult<()> {
        self.entries
            .lock()
            .unwrap()
            .retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn walk(&self, root: &Path, prune: &[&str]) -> FastmanResult<Vec<PathBuf>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root) && p.as_path() != root)
            .filter(|p| {
                let relative = p.strip_prefix(root).unwrap_or(p);
                !relative.components().any(|c| prune.iter().any(|d| c.as_os_str() == *d))
            })
            .cloned()
            .collect())
    }
}

/// Runtime over a fake filesystem, a recording reporter and `runner`.
pub fn runtime(fs: FakeFs, reporter: RecordingReporter, runner: MockProcessRunner) -> Runtime {
    Runtime::new(Box::new(fs), Box::new(runner), Box::new(reporter))
}
