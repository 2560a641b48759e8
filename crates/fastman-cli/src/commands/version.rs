//! `fastman version`.

use fastman_core::application::{Command, CommandDescriptor, CommandEnv};
use fastman_core::domain::DomainError;
use fastman_core::error::FastmanResult;

use super::boxed;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![CommandDescriptor::new(
        "version",
        "Show Fastman version",
        boxed(|_| Version),
    )?])
}

struct Version;

impl Command for Version {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let out = env.out();
        out.header(&format!("Fastman v{}", fastman_core::VERSION));
        out.info("The Complete FastAPI CLI Framework");
        out.line(&format!("Python: {}", python_version(env)));
        out.line(&format!("Package Manager: {}", env.context.toolchain()));
        Ok(())
    }
}

/// `python --version` output without the `Python ` prefix. Old interpreters
/// print it on stderr.
fn python_version(env: &CommandEnv<'_>) -> String {
    let python = env.context.python().to_string();
    match env.capture(vec![python, "--version".into()]) {
        Ok(outcome) if outcome.success() => {
            let text = if outcome.stdout.trim().is_empty() {
                outcome.stderr
            } else {
                outcome.stdout
            };
            let text = text.trim();
            text.strip_prefix("Python ").unwrap_or(text).to_string()
        }
        Ok(outcome) => {
            tracing::debug!(code = ?outcome.code, "python --version failed");
            "unknown".into()
        }
        Err(e) => {
            tracing::debug!(error = %e, "python interpreter not available");
            "unknown".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use fastman_core::application::ProcessOutcome;
    use fastman_core::application::ApplicationError;
    use fastman_core::domain::Toolchain;

    use super::super::test_support::{Harness, MockRunner};

    fn runner(outcome: fastman_core::error::FastmanResult<ProcessOutcome>) -> MockRunner {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|spec| spec.capture && spec.args == ["--version"])
            .returning(move |_| outcome.clone());
        runner
    }

    #[test]
    fn reports_versions_and_toolchain() {
        let h = Harness::with_runner(runner(Ok(ProcessOutcome {
            code: Some(0),
            stdout: "Python 3.12.1\n".into(),
            stderr: String::new(),
        })))
        .with_toolchain(Toolchain::Uv);

        assert_eq!(h.run(&["version"]).exit_code(), 0);
        assert!(h.reporter.contains(&format!("Fastman v{}", fastman_core::VERSION)));
        assert!(h.reporter.contains("Python: 3.12.1"));
        assert!(h.reporter.contains("Package Manager: uv"));
    }

    #[test]
    fn version_flags_dispatch_here() {
        let h = Harness::with_runner(runner(Ok(ProcessOutcome {
            code: Some(0),
            stdout: String::new(),
            stderr: "Python 2.7.18".into(),
        })));
        assert_eq!(h.run(&["--version"]).exit_code(), 0);
        assert!(h.reporter.contains("Python: 2.7.18"));
    }

    #[test]
    fn missing_interpreter_reads_unknown() {
        let h = Harness::with_runner(runner(Err(ApplicationError::ProcessSpawn {
            program: "python3".into(),
            reason: "not found".into(),
        }
        .into())));
        assert_eq!(h.run(&["-v"]).exit_code(), 0);
        assert!(h.reporter.contains("Python: unknown"));
    }
}
