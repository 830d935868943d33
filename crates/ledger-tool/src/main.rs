use std::path::PathBuf;

use ledger_lib::cli::{create_root_command, CommandOptions, CommandRegistry, LIST_COMMAND};
use ledger_lib::commands::{dispatch_command, register_commands};
use ledger_lib::config::ClientConfig;
use ledger_lib::errors::{handle_command_error, handle_fatal, LedgerError, Result};
use ledger_lib::output::{OutputSink, StdoutSink};
use ledger_lib::server::RpcServer;

#[tokio::main]
async fn main() {
    // Step 1: Create CommandRegistry with root command and register commands
    let mut registry = CommandRegistry::new(create_root_command());
    if let Err(e) = register_commands(&mut registry) {
        handle_fatal(e);
    }

    // Step 2: Build and parse root command
    let matches = registry.build_root().get_matches();

    // Step 3: Initialize Logger
    ledger_lib::logger::init(matches.get_flag("debug"));

    let options = CommandOptions::from_matches(&matches);
    let mut out = StdoutSink;

    let result = match matches.subcommand() {
        Some((LIST_COMMAND, _)) => list(&registry, &options, &mut out),
        Some((name, _)) => run(&registry, name, &matches, &options, &mut out).await,
        None => registry
            .build_root()
            .print_help()
            .map_err(LedgerError::Io),
    };

    if let Err(e) = result {
        handle_command_error(&e);
        std::process::exit(1);
    }
}

fn list(
    registry: &CommandRegistry,
    options: &CommandOptions,
    out: &mut dyn OutputSink,
) -> Result<()> {
    if options.json {
        registry.list_commands_json(out)
    } else {
        registry.list_commands(out)
    }
}

async fn run(
    registry: &CommandRegistry,
    name: &str,
    matches: &ledger_lib::cli::ArgMatches,
    options: &CommandOptions,
    out: &mut dyn OutputSink,
) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");
    let url = matches.get_one::<String>("url");
    let config = ClientConfig::load(config_path.map(PathBuf::as_path))?
        .with_url(url.map(String::as_str))?;

    let server = RpcServer::new(&config)?;
    tracing::debug!(url = server.url(), "Connecting to ledger server");
    dispatch_command(registry, name, &server, options, out).await
}
