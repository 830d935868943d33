pub mod registry;

use std::path::PathBuf;

pub use clap::ArgMatches;
pub use registry::{CommandBuilder, CommandHandler, CommandMeta, CommandRegistry};

use crate::errors::{LedgerError, Result};

/// Name of the built-in subcommand that lists registered commands.
pub const LIST_COMMAND: &str = "commands";

/// Options every handler receives, parsed from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    /// Verbose output: include the full structured server snapshot.
    pub full: bool,
    /// Sort map keys in structured output.
    pub sort_keys: bool,
    /// Machine-readable output for `commands`.
    pub json: bool,
    /// Run unsafe commands without asking.
    pub yes: bool,
}

impl CommandOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            full: matches.get_flag("full"),
            sort_keys: matches.get_flag("sort-keys"),
            json: matches
                .subcommand_matches(LIST_COMMAND)
                .is_some_and(|sub| sub.get_flag("json")),
            yes: matches.get_flag("yes"),
        }
    }
}

/// Creates the root clap Command with the global flags.
pub fn create_root_command() -> clap::Command {
    clap::Command::new("ledger-tool")
        .about("Query a ledger server's status")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            clap::Arg::new("url")
                .long("url")
                .global(true)
                .value_name("URL")
                .help("JSON-RPC endpoint of the ledger server"),
        )
        .arg(
            clap::Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file (YAML or JSON)"),
        )
        .arg(
            clap::Arg::new("full")
                .short('f')
                .long("full")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Print the full server_info payload"),
        )
        .arg(
            clap::Arg::new("sort-keys")
                .long("sort-keys")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Sort keys in structured output"),
        )
        .arg(
            clap::Arg::new("yes")
                .short('y')
                .long("yes")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Do not ask for confirmation"),
        )
        .arg(
            clap::Arg::new("debug")
                .short('d')
                .long("debug")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            clap::Command::new(LIST_COMMAND)
                .about("List available commands")
                .arg(
                    clap::Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Output the listing in JSON format"),
                ),
        )
}

/// Asks before running a command that is not marked safe.
///
/// Returns `Aborted` if the user declines or cancels.
pub fn confirm_if_unsafe(meta: &CommandMeta, options: &CommandOptions) -> Result<()> {
    if meta.safe || options.yes {
        return Ok(());
    }
    let prompt = format!("`{}` may modify server state. Continue?", meta.name);
    match crate::prompt::confirm(&prompt, false)? {
        Some(true) => Ok(()),
        _ => Err(LedgerError::Aborted(format!("{} not confirmed", meta.name))),
    }
}
