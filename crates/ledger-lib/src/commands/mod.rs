pub mod info;

use crate::cli::{confirm_if_unsafe, CommandOptions, CommandRegistry};
use crate::errors::{LedgerError, Result};
use crate::output::OutputSink;
use crate::server::LedgerServer;

/// Register every server command.
pub fn register_commands(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(info::info_meta())?;
    Ok(())
}

/// Look up `name` and run its handler against `server`.
///
/// Unsafe commands are confirmed first unless `options.yes` is set.
/// Handler errors are returned unchanged.
pub async fn dispatch_command(
    registry: &CommandRegistry,
    name: &str,
    server: &dyn LedgerServer,
    options: &CommandOptions,
    out: &mut dyn OutputSink,
) -> Result<()> {
    let meta = registry
        .lookup(name)
        .ok_or_else(|| LedgerError::UnknownCommand(name.to_string()))?;
    confirm_if_unsafe(meta, options)?;

    tracing::debug!(command = %meta.name, safe = meta.safe, "Executing command");
    meta.handler.run(server, options, out).await
}
