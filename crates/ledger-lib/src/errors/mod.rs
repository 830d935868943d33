use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Duplicate command name: {0}")]
    DuplicateCommand(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Server unavailable ({url}): {message}")]
    ServerUnavailable { url: String, message: String },

    #[error("RPC error ({method}): {message}")]
    Rpc { method: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file error ({path}): {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Logs a fatal error and exits the process with code 1.
///
/// Intended for unrecoverable errors during initialization, before any
/// command has been dispatched.
pub fn handle_fatal(err: LedgerError) -> ! {
    tracing::error!("Fatal error: {}", err);
    std::process::exit(1)
}

/// Maps a `LedgerError` to user-friendly CLI output with actionable suggestions.
///
/// Uses `crate::output::error()` for the main message and
/// `crate::output::info()` for hints.
pub fn handle_command_error(err: &LedgerError) {
    use crate::output;

    match err {
        LedgerError::ServerUnavailable { url, message } => {
            output::error(&format!("Cannot reach ledger server at {}: {}", url, message));
            output::info("Check that the server is running, or pass `--url` / set LEDGER_RPC_URL.");
        }
        LedgerError::Rpc { method, message } => {
            output::error(&format!("Server rejected `{}`: {}", method, message));
        }
        LedgerError::Http(e) => {
            output::error(&format!("Network error: {}", e));
            output::info("Check your network connection.");
        }
        LedgerError::UnknownCommand(name) => {
            output::error(&format!("Unknown command: {}", name));
            output::info("Run `ledger-tool commands` to list available commands.");
        }
        LedgerError::Config(msg) => {
            output::error(&format!("Configuration error: {}", msg));
        }
        LedgerError::ConfigFile { path, message } => {
            output::error(&format!("Cannot load {}: {}", path.display(), message));
        }
        LedgerError::Aborted(msg) => {
            output::warning(&format!("Aborted: {}", msg));
        }
        _ => {
            output::error(&format!("{}", err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::InvalidRange("5-3".into());
        assert_eq!(err.to_string(), "Invalid range: 5-3");

        let err = LedgerError::DuplicateCommand("info".into());
        assert_eq!(err.to_string(), "Duplicate command name: info");

        let err = LedgerError::ServerUnavailable {
            url: "http://127.0.0.1:5005".into(),
            message: "connection refused".into(),
        };
        assert!(err.to_string().contains("127.0.0.1:5005"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LedgerError = io.into();
        assert!(matches!(err, LedgerError::Io(_)));
    }

    #[test]
    fn test_handle_command_error_does_not_panic() {
        handle_command_error(&LedgerError::Rpc {
            method: "server_info".into(),
            message: "noNetwork".into(),
        });
        handle_command_error(&LedgerError::UnsupportedType("key must be a string".into()));
    }
}
