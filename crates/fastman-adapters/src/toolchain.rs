//! Tool-chain detection from marker files and `PATH`.

use std::path::Path;

use fastman_core::domain::{Toolchain, ToolchainMarkers};
use tracing::debug;

/// Look at `root` (and `PATH`) for the files that decide the tool chain.
pub fn detect_markers(root: &Path) -> ToolchainMarkers {
    ToolchainMarkers {
        uv_lock: root.join("uv.lock").is_file(),
        poetry_lock: root.join("poetry.lock").is_file(),
        pipfile: root.join("Pipfile").is_file(),
        pyproject: root.join("pyproject.toml").is_file(),
        uv_on_path: which::which("uv").is_ok(),
    }
}

/// Tool chain in use for the project at `root`.
pub fn detect_toolchain(root: &Path) -> Toolchain {
    let markers = detect_markers(root);
    let toolchain = Toolchain::from_markers(markers);
    debug!(?markers, %toolchain, "detected tool chain");
    toolchain
}

/// First Python interpreter found on `PATH`, if any.
pub fn find_python() -> Option<&'static str> {
    ["python3", "python"]
        .into_iter()
        .find(|candidate| which::which(candidate).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn lock_files_are_detected() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            ToolchainMarkers {
                uv_on_path: false,
                ..detect_markers(dir.path())
            },
            ToolchainMarkers::default()
        );

        touch(dir.path(), "Pipfile");
        assert_eq!(detect_toolchain(dir.path()), Toolchain::Pipenv);

        touch(dir.path(), "poetry.lock");
        assert_eq!(detect_toolchain(dir.path()), Toolchain::Poetry);

        touch(dir.path(), "uv.lock");
        assert_eq!(detect_toolchain(dir.path()), Toolchain::Uv);
    }

    #[test]
    fn directories_named_like_markers_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("uv.lock")).unwrap();
        assert!(!detect_markers(dir.path()).uv_lock);
    }
}
