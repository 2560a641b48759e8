//! Project-local plugin commands.
//!
//! Each manifest found by [`PluginLoader`] becomes a descriptor whose
//! handler runs the manifest's `run` argv with the command's own tokens
//! appended.

use std::path::Path;
use std::sync::Arc;

use fastman_adapters::{PluginLoader, PluginManifest};
use fastman_core::application::{Command, CommandDescriptor, CommandEnv, CommandRegistry};
use fastman_core::domain::{ArgumentVector, DomainError};
use fastman_core::error::FastmanResult;
use tracing::{debug, warn};

/// Load manifests from `dirs` (relative to `root`) and register them after
/// the built-ins. Returns how many were registered.
pub fn register_plugins<S: AsRef<Path>>(
    registry: &mut CommandRegistry,
    root: &Path,
    dirs: &[S],
) -> usize {
    let loader = PluginLoader::new(root, dirs);
    let mut registered = 0;

    for manifest in loader.load_all() {
        let source = manifest.source.clone();
        match descriptor(manifest) {
            Ok(descriptor) => {
                let name = descriptor.name().to_string();
                if registry.register(descriptor).is_some() {
                    warn!(command = %name, source = %source.display(), "plugin replaces an existing command");
                }
                registered += 1;
            }
            Err(e) => warn!(error = %e, source = %source.display(), "skipping plugin"),
        }
    }

    debug!(registered, "plugins loaded");
    registered
}

fn descriptor(manifest: PluginManifest) -> Result<CommandDescriptor, DomainError> {
    let description = if manifest.description.is_empty() {
        format!("Custom command ({})", manifest.source.display())
    } else {
        manifest.description.clone()
    };
    let signature = manifest.signature.clone();
    let manifest = Arc::new(manifest);

    CommandDescriptor::new(&signature, description, move |args| {
        Box::new(PluginCommand {
            manifest: Arc::clone(&manifest),
            args,
        }) as Box<dyn Command>
    })
}

struct PluginCommand {
    manifest: Arc<PluginManifest>,
    args: ArgumentVector,
}

impl PluginCommand {
    fn argv(&self, env: &CommandEnv<'_>) -> Vec<String> {
        let argv = self
            .manifest
            .run
            .iter()
            .chain(self.args.raw())
            .cloned();
        if self.manifest.use_run_prefix {
            env.context.toolchain().wrap(argv)
        } else {
            argv.collect()
        }
    }
}

impl Command for PluginCommand {
    fn execute(&self, env: &CommandEnv<'_>) -> FastmanResult<()> {
        debug!(command = self.manifest.name(), "running plugin");
        env.run(self.argv(env))
    }
}
