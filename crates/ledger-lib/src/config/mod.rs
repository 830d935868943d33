//! Client configuration: where the ledger server lives and how long to wait
//! for it.
//!
//! Values are layered, later layers winning:
//! built-in defaults → config file (YAML or JSON) → environment → CLI flags.
//! The CLI layer is applied by the driver through [`ClientConfig::with_url`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

pub const ENV_RPC_URL: &str = "LEDGER_RPC_URL";
pub const ENV_TIMEOUT: &str = "LEDGER_TIMEOUT";

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:5005";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the ledger server.
    pub rpc_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Load configuration from `path` (or the default location, if present)
    /// and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.ledger-tool/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".ledger-tool").join("config.yaml"))
    }

    /// Read a config file. `.json` files are parsed as JSON, anything else
    /// as YAML. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| LedgerError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed: Result<Self> = if is_json {
            crate::json::deserialize(&raw)
        } else {
            serde_yaml::from_str(&raw).map_err(Into::into)
        };
        parsed.map_err(|e| LedgerError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_RPC_URL).filter(|v| !v.trim().is_empty()) {
            self.rpc_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                LedgerError::Config(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_TIMEOUT, raw
                ))
            })?;
        }
        Ok(())
    }

    /// Override the endpoint (from `--url`).
    pub fn with_url(mut self, url: Option<&str>) -> Result<Self> {
        if let Some(url) = url {
            self.rpc_url = url.to_string();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(LedgerError::Config(format!(
                "rpc_url must be an http(s) URL, got {:?}",
                self.rpc_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(LedgerError::Config("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}
