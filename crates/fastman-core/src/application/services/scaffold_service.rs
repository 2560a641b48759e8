//! Scaffold Service - writes scaffold plans to disk.
//!
//! 1. Validate the plan
//! 2. Create directories (plus `__init__.py` for Python packages)
//! 3. Write files that do not exist yet
//! 4. On the first failure, remove everything created in this run and
//!    restore the previous content of overwritten files

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{PlanEntry, ScaffoldPlan, WriteMode},
    error::{FastmanError, FastmanResult},
};

/// What an applied plan did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    /// Files written, relative to the plan root.
    pub written: Vec<PathBuf>,
    /// Planned files left alone because they already existed.
    pub skipped: Vec<PathBuf>,
}

/// Applies [`ScaffoldPlan`]s through a [`Filesystem`].
pub struct ScaffoldService<'a> {
    filesystem: &'a dyn Filesystem,
}

/// Paths touched during one `apply`, in order. Each file is recorded
/// before it is written.
#[derive(Default)]
struct Created {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
    /// Overwritten files and their previous content.
    replaced: Vec<(PathBuf, String)>,
}

impl<'a> ScaffoldService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Apply `plan`. Existing files are never overwritten unless the entry
    /// is marked [`WriteMode::Overwrite`].
    #[instrument(skip_all, fields(root = %plan.root().display(), entries = plan.entry_count()))]
    pub fn apply(&self, plan: &ScaffoldPlan) -> FastmanResult<ScaffoldReport> {
        plan.validate().map_err(FastmanError::Domain)?;

        let mut created = Created::default();
        let mut report = ScaffoldReport::default();

        match self.write_all(plan, &mut created, &mut report) {
            Ok(()) => {
                info!(
                    written = report.written.len(),
                    skipped = report.skipped.len(),
                    "Scaffold applied"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Write failed, attempting rollback");
                self.rollback(&created);
                Err(e)
            }
        }
    }

    fn write_all(
        &self,
        plan: &ScaffoldPlan,
        created: &mut Created,
        report: &mut ScaffoldReport,
    ) -> FastmanResult<()> {
        let root = plan.root();
        self.ensure_dir(root, created)?;

        for entry in plan.entries() {
            match entry {
                PlanEntry::Directory(dir) => {
                    let path = root.join(&dir.path);
                    self.ensure_dir(&path, created)?;

                    if dir.python_package {
                        let init = path.join("__init__.py");
                        if !self.filesystem.exists(&init) {
                            created.files.push(init.clone());
                            self.filesystem.write_file(&init, "")?;
                        }
                    }
                }
                PlanEntry::File(file) => {
                    let path = root.join(&file.path);
                    let existed = self.filesystem.exists(&path);

                    if existed && file.mode == WriteMode::Create {
                        report.skipped.push(file.path.clone());
                        continue;
                    }

                    if let Some(parent) = path.parent() {
                        self.ensure_dir(parent, created)?;
                    }
                    if existed {
                        let previous = self.filesystem.read_to_string(&path)?;
                        created.replaced.push((path.clone(), previous));
                    } else {
                        created.files.push(path.clone());
                    }
                    self.filesystem.write_file(&path, &file.content)?;
                    report.written.push(file.path.clone());
                }
            }
        }

        Ok(())
    }

    /// Create `path` and remember which of its ancestors are new.
    fn ensure_dir(&self, path: &Path, created: &mut Created) -> FastmanResult<()> {
        if self.filesystem.exists(path) {
            return Ok(());
        }

        let mut missing: Vec<PathBuf> = path
            .ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !self.filesystem.exists(p))
            .map(Path::to_path_buf)
            .collect();
        missing.reverse();

        self.filesystem.create_dir_all(path)?;
        created.dirs.extend(missing);
        Ok(())
    }

    /// Best-effort undo of everything this run touched.
    fn rollback(&self, created: &Created) {
        for (file, previous) in created.replaced.iter().rev() {
            if let Err(e) = self.filesystem.write_file(file, previous) {
                warn!(error = %e, path = %file.display(), "Restore failed");
            }
        }
        for file in created.files.iter().rev() {
            if !self.filesystem.exists(file) {
                continue;
            }
            if let Err(e) = self.filesystem.remove_file(file) {
                warn!(error = %e, path = %file.display(), "Rollback failed");
            }
        }
        for dir in created.dirs.iter().rev() {
            if !self.filesystem.exists(dir) {
                continue;
            }
            if let Err(e) = self.filesystem.remove_dir_all(dir) {
                warn!(error = %e, path = %dir.display(), "Rollback failed");
            }
        }
        info!(
            files = created.files.len(),
            restored = created.replaced.len(),
            dirs = created.dirs.len(),
            "Rollback finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeFs;

    #[test]
    fn writes_directories_packages_and_files() {
        let fs = FakeFs::default();
        let plan = ScaffoldPlan::new("shop")
            .with_package("app/features/orders")
            .with_directory("logs")
            .with_file("app/features/orders/models.py", "class Order: ...");

        let report = ScaffoldService::new(&fs).apply(&plan).unwrap();

        assert_eq!(report.written, [PathBuf::from("app/features/orders/models.py")]);
        assert!(report.skipped.is_empty());
        assert_eq!(fs.read("shop/app/features/orders/__init__.py").as_deref(), Some(""));
        assert!(fs.is_dir(Path::new("shop/logs")));
        assert_eq!(
            fs.read("shop/app/features/orders/models.py").as_deref(),
            Some("class Order: ...")
        );
    }

    #[test]
    fn never_clobbers_existing_files() {
        let fs = FakeFs::default();
        fs.create_dir_all(Path::new("proj/app")).unwrap();
        fs.seed_file("proj/app/main.py", "mine");
        fs.seed_file("proj/app/__init__.py", "# keep");

        let plan = ScaffoldPlan::new("proj")
            .with_package("app")
            .with_file("app/main.py", "generated")
            .with_file("app/config.py", "settings");

        let report = ScaffoldService::new(&fs).apply(&plan).unwrap();

        assert_eq!(fs.read("proj/app/main.py").as_deref(), Some("mine"));
        assert_eq!(fs.read("proj/app/__init__.py").as_deref(), Some("# keep"));
        assert_eq!(report.skipped, [PathBuf::from("app/main.py")]);
        assert_eq!(report.written, [PathBuf::from("app/config.py")]);
    }

    #[test]
    fn overwrite_entries_replace_content() {
        let fs = FakeFs::default();
        fs.create_dir_all(Path::new("proj")).unwrap();
        fs.seed_file("proj/.env", "OLD=1");

        let mut plan = ScaffoldPlan::new("proj");
        plan.add_file_overwriting(".env", "NEW=1");

        ScaffoldService::new(&fs).apply(&plan).unwrap();
        assert_eq!(fs.read("proj/.env").as_deref(), Some("NEW=1"));
    }

    #[test]
    fn rolls_back_everything_created_in_this_run() {
        let fs = FakeFs {
            fail_on: Some(PathBuf::from("work/app/features/orders/router.py")),
            ..FakeFs::default()
        };
        fs.create_dir_all(Path::new("work/app/features")).unwrap();
        fs.seed_file("work/app/features/keep.py", "existing");

        let plan = ScaffoldPlan::new("work")
            .with_package("app/features/orders")
            .with_file("app/features/orders/models.py", "models")
            .with_file("app/features/orders/router.py", "router");

        let err = ScaffoldService::new(&fs).apply(&plan).unwrap_err();

        assert!(err.to_string().contains("injected failure"));
        assert!(!fs.has("work/app/features/orders"));
        assert!(!fs.has("work/app/features/orders/models.py"));
        assert!(!fs.has("work/app/features/orders/__init__.py"));
        assert!(fs.has("work/app/features"));
        assert_eq!(fs.read("work/app/features/keep.py").as_deref(), Some("existing"));
    }

    #[test]
    fn rollback_restores_overwritten_files() {
        let fs = FakeFs {
            fail_on: Some(PathBuf::from("proj/app/main.py")),
            ..FakeFs::default()
        };
        fs.create_dir_all(Path::new("proj")).unwrap();
        fs.seed_file("proj/.env", "OLD=1");

        let mut plan = ScaffoldPlan::new("proj");
        plan.add_file_overwriting(".env", "NEW=1");
        plan.add_file("app/main.py", "app = FastAPI()");

        let err = ScaffoldService::new(&fs).apply(&plan).unwrap_err();

        assert!(err.to_string().contains("injected failure"));
        assert_eq!(fs.read("proj/.env").as_deref(), Some("OLD=1"));
        assert!(!fs.has("proj/app/main.py"));
        assert!(!fs.has("proj/app"));
    }

    #[test]
    fn invalid_plan_writes_nothing() {
        let fs = FakeFs::default();
        let plan = ScaffoldPlan::new("x").with_file("/etc/passwd", "nope");

        assert!(ScaffoldService::new(&fs).apply(&plan).is_err());
        assert!(fs.entries.lock().unwrap().is_empty());
    }
}
