//! Harness for command tests: in-memory filesystem, recording reporter and
//! a mocked process runner behind a real dispatcher.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use fastman_adapters::MemoryFilesystem;
use fastman_core::application::ports::{ProcessOutcome, ProcessRunner, ProcessSpec, Reporter};
use fastman_core::application::{
    CommandRegistry, DispatchOutcome, Dispatcher, InvocationContext, Runtime,
};
use fastman_core::domain::Toolchain;
use fastman_core::error::FastmanResult;

mockall::mock! {
    pub Runner {}

    impl ProcessRunner for Runner {
        fn run(&self, spec: &ProcessSpec) -> FastmanResult<ProcessOutcome>;
    }
}

pub const ROOT: &str = "/work";

/// Reporter that records every message as `"<kind>: <msg>"`.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    messages: Arc<Mutex<Vec<String>>>,
    answer: Arc<AtomicBool>,
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
        self.answer.load(Ordering::SeqCst)
    }
}

/// Built-in registry over a project rooted at [`ROOT`].
pub struct Harness {
    pub fs: MemoryFilesystem,
    pub reporter: RecordingReporter,
    pub registry: CommandRegistry,
    pub context: InvocationContext,
    runtime: Runtime,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_runner(MockRunner::new())
    }

    /// Harness whose child processes are answered by `runner`.
    pub fn with_runner(runner: MockRunner) -> Self {
        let fs = MemoryFilesystem::new();
        fastman_core::application::ports::Filesystem::create_dir_all(&fs, Path::new(ROOT))
            .unwrap();
        let reporter = RecordingReporter::default();

        let mut registry = CommandRegistry::new();
        super::register_builtin(&mut registry).unwrap();

        Self {
            runtime: Runtime::new(
                Box::new(fs.clone()),
                Box::new(runner),
                Box::new(reporter.clone()),
            ),
            context: InvocationContext::new(ROOT, Toolchain::Pip).with_python("python3"),
            fs,
            reporter,
            registry,
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.context = InvocationContext::new(ROOT, toolchain).with_python("python3");
        self
    }

    /// Answer to every confirmation prompt.
    pub fn answering(self, yes: bool) -> Self {
        self.reporter.answer.store(yes, Ordering::SeqCst);
        self
    }

    pub fn run(&self, argv: &[&str]) -> DispatchOutcome {
        let argv: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
        Dispatcher::new(&self.registry, &self.context, &self.runtime).dispatch(&argv)
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        Path::new(ROOT).join(relative)
    }

    pub fn file(&self, relative: &str) -> Option<String> {
        self.fs.read_file(self.path(relative))
    }

    pub fn seed(&self, relative: &str, content: &str) {
        self.fs.insert_file(self.path(relative), content);
    }

    pub fn seed_dir(&self, relative: &str) {
        fastman_core::application::ports::Filesystem::create_dir_all(
            &self.fs,
            &self.path(relative),
        )
        .unwrap();
    }
}

/// Runner expecting exactly one call with `argv`, answering `code`.
pub fn expect_argv(argv: &[&str], code: i32) -> MockRunner {
    let expected: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(move |spec| {
            let mut actual = vec![spec.program.clone()];
            actual.extend(spec.args.iter().cloned());
            actual == expected
        })
        .times(1)
        .returning(move |_| {
            Ok(ProcessOutcome {
                code: Some(code),
                ..ProcessOutcome::default()
            })
        });
    runner
}
