//! `fastman serve`: uvicorn development server.

use fastman_core::application::{Command, CommandDescriptor, CommandEnv};
use fastman_core::domain::{ArgumentVector, DomainError};
use fastman_core::error::FastmanResult;

use super::boxed;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

pub fn descriptors() -> Result<Vec<CommandDescriptor>, DomainError> {
    Ok(vec![CommandDescriptor::new(
        "serve {--host=127.0.0.1} {--port=8000} {--reload} {--no-reload}",
        "Start development server with hot reload",
        boxed(Serve),
    )?])
}

struct Serve(ArgumentVector);

impl Serve {
    /// The uvicorn argv, run prefix included.
    fn argv(&self, env: &CommandEnv<'_>) -> Result<Vec<String>, DomainError> {
        let host = self.0.option_or("host", DEFAULT_HOST);
        let port: u16 = self.0.parse_option("port", DEFAULT_PORT)?;
        let port = port.to_string();

        let mut argv = env
            .context
            .wrap(&["uvicorn", "app.main:app", "--host", host, "--port", port.as_str()]);
        // `--reload` is accepted for symmetry; reloading is already the default.
        if !self.0.flag("no-reload") {
            argv.push("--reload".into());
        }
        Ok(argv)
    }
}

impl Command for Serve {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        let argv = self.argv(env)?;
        let out = env.out();
        out.info(&format!(
            "Starting server at http://{}:{}",
            self.0.option_or("host", DEFAULT_HOST),
            self.0.option_or("port", "8000")
        ));
        out.info("Press CTRL+C to stop");
        env.run(argv)
    }
}
