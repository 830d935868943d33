//! Info CLI command: display the server's ledger indices and complete ranges.
//!
//! With `--full`, also dumps the whole `server_info` payload.

use async_trait::async_trait;
use clap::Command;

use crate::cli::{CommandBuilder, CommandHandler, CommandMeta, CommandOptions};
use crate::errors::Result;
use crate::json::{self, PrettyOptions};
use crate::output::OutputSink;
use crate::server::{format_index, LedgerServer};

/// Build the `info` clap command.
pub fn info_command() -> Command {
    Command::new("info").about("info - return server_info")
}

/// Build the `CommandMeta` for registry registration.
pub fn info_meta() -> CommandMeta {
    CommandBuilder::from_clap(info_command(), InfoCommand)
        .safe()
        .build()
}

pub struct InfoCommand;

#[async_trait]
impl CommandHandler for InfoCommand {
    async fn run(
        &self,
        server: &dyn LedgerServer,
        options: &CommandOptions,
        out: &mut dyn OutputSink,
    ) -> Result<()> {
        out.write_line(&format!("first = {}", format_index(server.first().await?)))?;
        out.write_line(&format!("last = {}", format_index(server.last().await?)))?;
        out.write_line(&format!("closed = {}", format_index(server.closed().await?)))?;
        out.write_line(&format!("current = {}", format_index(server.current().await?)))?;
        out.write_line(&format!("validated = {}", format_index(server.validated().await?)))?;
        out.write_line(&format!("complete = {}", server.complete().await?))?;

        if options.full {
            let info = server.info().await?;
            let pretty = PrettyOptions {
                sort_keys: options.sort_keys,
                ..PrettyOptions::default()
            };
            out.write_block(&json::pretty_print_with(&info, &pretty)?)?;
        }
        Ok(())
    }
}
