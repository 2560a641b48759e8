//! End-to-end tests for the `fastman` binary.

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `fastman` in `dir` with file logging off and no inherited filters.
fn fastman(dir: &TempDir) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("fastman");
    cmd.current_dir(dir.path())
        .env("FASTMAN__LOGGING__FILE", "false")
        .env("FASTMAN__OUTPUT__NO_COLOR", "true")
        .env_remove("FASTMAN_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_arguments_lists_commands() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .assert()
        .success()
        .stdout(predicate::str::contains("Available commands:"))
        .stdout(predicate::str::contains("make:feature"))
        .stdout(predicate::str::contains("migrate:rollback"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Fastman v{}", env!("CARGO_PKG_VERSION"))))
        .stdout(predicate::str::contains("Package Manager: pip"));
}

#[test]
fn test_unknown_command_fails() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .arg("bogus:command")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: bogus:command"));
}

#[test]
fn test_list_json_is_parseable() {
    let temp = TempDir::new().unwrap();
    let output = fastman(&temp)
        .args(["list", "--format=json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert!(names.contains(&"serve"));
    assert!(names.contains(&"generate:key"));
    assert!(names.contains(&"make:controller"));
    assert!(names.contains(&"config:cache"));
    assert!(names.contains(&"database:seed"));
}

#[test]
fn test_make_controller_creates_module() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .args(["make:controller", "UserProfile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app/http/controllers/user_profile.py"));

    let controller =
        fs::read_to_string(temp.path().join("app/http/controllers/user_profile.py")).unwrap();
    assert!(controller.contains("class UserProfileController:"));
}

#[test]
fn test_config_cache_writes_json() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".env"), "# local\nDEBUG=true\nPORT = 8000\n").unwrap();

    fastman(&temp).arg("config:cache").assert().success();
    let cached: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("config_cache.json")).unwrap())
            .unwrap();
    assert_eq!(cached["PORT"], "8000");

    fastman(&temp).arg("config:clear").assert().success();
    assert!(!temp.path().join("config_cache.json").exists());
}

#[test]
fn test_make_feature_creates_files() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("app/features")).unwrap();

    fastman(&temp)
        .args(["make:feature", "blog_post", "--crud"])
        .assert()
        .success();

    let feature = temp.path().join("app/features/blog_post");
    for file in ["__init__.py", "models.py", "schemas.py", "service.py", "router.py"] {
        assert!(feature.join(file).exists(), "missing {file}");
    }
    let router = fs::read_to_string(feature.join("router.py")).unwrap();
    assert!(router.contains("/blog_posts"));
}

#[test]
fn test_make_feature_outside_a_feature_project_fails() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .args(["make:feature", "blog"])
        .assert()
        .code(1);
    assert!(!temp.path().join("app/features/blog").exists());
}

#[test]
fn test_missing_argument_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("app/features")).unwrap();
    fastman(&temp)
        .arg("make:feature")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("name"));
}

#[test]
fn test_generate_key_writes_env() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(".env"), "DEBUG=true\nSECRET_KEY=changeme\n").unwrap();

    fastman(&temp).arg("generate:key").assert().success();

    let env = fs::read_to_string(temp.path().join(".env")).unwrap();
    assert!(env.starts_with("DEBUG=true\nSECRET_KEY="));
    assert!(!env.contains("changeme"));
}

#[test]
fn test_completion_bash() {
    let temp = TempDir::new().unwrap();
    fastman(&temp)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_fastman()"));
}

#[cfg(unix)]
#[test]
fn test_sigterm_is_not_reported_as_cancelled() {
    use std::time::Duration;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("app/console/commands");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("wait.toml"),
        "signature = \"custom:wait\"\nrun = [\"sleep\", \"30\"]\n",
    )
    .unwrap();

    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_fastman"))
        .current_dir(temp.path())
        .env("FASTMAN__LOGGING__FILE", "false")
        .arg("custom:wait")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .unwrap();
    std::thread::sleep(Duration::from_millis(500));
    std::process::Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .unwrap();

    let status = child.wait().unwrap();
    assert_ne!(status.code(), Some(130));
    assert!(!status.success());
}

#[test]
fn test_plugin_from_project_directory_is_listed() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("app/console/commands");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("hello.toml"),
        "signature = \"custom:hello\"\ndescription = \"Say hello\"\nrun = [\"echo\", \"hi\"]\n",
    )
    .unwrap();

    fastman(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("custom:hello"))
        .stdout(predicate::str::contains("Say hello"));
}

#[test]
fn test_plugins_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("app/console/commands");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("hello.toml"), "signature = \"custom:hello\"\nrun = [\"echo\"]\n").unwrap();

    fastman(&temp)
        .env("FASTMAN__PLUGINS__ENABLED", "false")
        .arg("custom:hello")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command"));
}
