// ledger-lib: command registry, server access and output formatting for ledger-tool

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod json;
pub mod logger;
pub mod output;
pub mod prompt;
pub mod range;
pub mod server;
