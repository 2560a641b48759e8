//! Child process adapter using `std::process`.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use fastman_core::{
    application::{
        ApplicationError,
        ports::{ProcessOutcome, ProcessRunner, ProcessSpec},
    },
    error::FastmanResult,
};
use tracing::{debug, instrument};

/// Runs programs on the host, blocking until they exit.
///
/// Inherited stdio by default so package managers and servers talk to the
/// terminal directly. Ctrl-C reaches the child through the terminal's
/// process group.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    #[instrument(skip_all, fields(command = %spec))]
    fn run(&self, spec: &ProcessSpec) -> FastmanResult<ProcessOutcome> {
        let program = resolve(spec)?;

        let mut command = Command::new(&program);
        command.args(&spec.args);
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }

        let outcome = if spec.capture {
            let output = command
                .stdin(Stdio::null())
                .output()
                .map_err(|e| spawn_error(spec, &e))?;
            ProcessOutcome {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        } else {
            let status = command.status().map_err(|e| spawn_error(spec, &e))?;
            ProcessOutcome {
                code: status.code(),
                ..ProcessOutcome::default()
            }
        };

        debug!(code = ?outcome.code, "child exited");
        Ok(outcome)
    }
}

/// Look `spec.program` up on `PATH`; relative paths resolve against the
/// child's working directory.
fn resolve(spec: &ProcessSpec) -> Result<PathBuf, ApplicationError> {
    let cwd = match &spec.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().map_err(|e| spawn_error(spec, &e))?,
    };
    which::which_in(&spec.program, std::env::var_os("PATH"), cwd).map_err(|e| {
        ApplicationError::ProcessSpawn {
            program: spec.program.clone(),
            reason: e.to_string(),
        }
    })
}

fn spawn_error(spec: &ProcessSpec, e: &io::Error) -> ApplicationError {
    ApplicationError::ProcessSpawn {
        program: spec.program.clone(),
        reason: e.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_output_and_exit_code() {
        let spec = ProcessSpec::new("sh")
            .args(["-c", "echo hello; echo oops >&2; exit 3"])
            .captured();
        let outcome = SystemProcessRunner::new().run(&spec).unwrap();

        assert_eq!(outcome.code, Some(3));
        assert!(!outcome.success());
        assert_eq!(outcome.stdout.trim(), "hello");
        assert_eq!(outcome.stderr.trim(), "oops");
    }

    #[test]
    fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ProcessSpec::new("pwd").cwd(dir.path()).captured();
        let outcome = SystemProcessRunner::new().run(&spec).unwrap();

        let reported = std::fs::canonicalize(outcome.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn relative_program_resolves_against_the_child_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("venv/bin")).unwrap();
        std::os::unix::fs::symlink("/bin/sh", dir.path().join("venv/bin/python")).unwrap();

        let spec = ProcessSpec::new("./venv/bin/python")
            .args(["-c", "echo ran"])
            .cwd(dir.path())
            .captured();
        let outcome = SystemProcessRunner::new().run(&spec).unwrap();

        assert_eq!(outcome.code, Some(0));
        assert_eq!(outcome.stdout.trim(), "ran");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let spec = ProcessSpec::new("definitely-not-a-real-program-fastman");
        let err = SystemProcessRunner::new().run(&spec).unwrap_err();
        assert!(err.to_string().starts_with("Could not run 'definitely-not-a-real-program-fastman'"));
    }
}
