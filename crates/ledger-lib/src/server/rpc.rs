//! JSON-RPC client for a ledger server's admin/public HTTP port.
//!
//! Requests use the `{"method": ..., "params": [{...}]}` envelope and read
//! the `result` object of the reply. A reply whose `result.status` is
//! `"error"` becomes `LedgerError::Rpc`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use super::LedgerServer;
use crate::config::ClientConfig;
use crate::errors::{LedgerError, Result};
use crate::range::{self, RangeSet};

/// A [`LedgerServer`] backed by HTTP JSON-RPC calls.
///
/// The `server_info` reply is fetched once and reused, so `first`, `last`,
/// `complete` and `info` describe the same snapshot.
pub struct RpcServer {
    client: reqwest::Client,
    url: String,
    server_info: OnceCell<Value>,
}

impl RpcServer {
    /// Build a client for the endpoint in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(LedgerError::Http)?;
        Ok(Self {
            client,
            url: config.rpc_url.clone(),
            server_info: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one RPC call and return its `result` object.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        tracing::debug!(method, url = %self.url, "rpc request");
        let body = json!({ "method": method, "params": [params] });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::ServerUnavailable {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Rpc {
                method: method.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let mut envelope: Value = response.json().await?;
        let result = envelope
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| rpc_error(method, "reply has no result"))?;

        if result.get("status").and_then(Value::as_str) == Some("error") {
            let message = result
                .get("error_message")
                .or_else(|| result.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            tracing::debug!(method, error = message, "rpc error reply");
            return Err(rpc_error(method, message));
        }
        Ok(result)
    }

    async fn server_info(&self) -> Result<&Value> {
        self.server_info
            .get_or_try_init(|| async {
                let mut result = self.call("server_info", json!({})).await?;
                result
                    .get_mut("info")
                    .map(Value::take)
                    .ok_or_else(|| rpc_error("server_info", "reply has no info"))
            })
            .await
    }

    /// Index of the `closed` or `validated` ledger.
    async fn ledger_index(&self, which: &str) -> Result<Option<u32>> {
        let result = self.call("ledger", json!({ "ledger_index": which })).await?;
        let index = result
            .get("ledger")
            .and_then(|ledger| ledger.get("ledger_index"))
            .or_else(|| result.get("ledger_index"));
        parse_index("ledger", index)
    }
}

#[async_trait]
impl LedgerServer for RpcServer {
    async fn first(&self) -> Result<Option<u32>> {
        Ok(self.complete().await?.first())
    }

    async fn last(&self) -> Result<Option<u32>> {
        Ok(self.complete().await?.last())
    }

    async fn closed(&self) -> Result<Option<u32>> {
        self.ledger_index("closed").await
    }

    async fn current(&self) -> Result<Option<u32>> {
        let result = self.call("ledger_current", json!({})).await?;
        parse_index("ledger_current", result.get("ledger_current_index"))
    }

    async fn validated(&self) -> Result<Option<u32>> {
        self.ledger_index("validated").await
    }

    async fn complete(&self) -> Result<RangeSet> {
        let info = self.server_info().await?;
        match info.get("complete_ledgers").and_then(Value::as_str) {
            Some(text) => range::from_string(text),
            None => Ok(RangeSet::new()),
        }
    }

    async fn info(&self) -> Result<Value> {
        self.server_info().await.cloned()
    }
}

fn rpc_error(method: &str, message: &str) -> LedgerError {
    LedgerError::Rpc {
        method: method.to_string(),
        message: message.to_string(),
    }
}

/// Ledger indices arrive either as numbers or as numeric strings.
fn parse_index(method: &str, value: Option<&Value>) -> Result<Option<u32>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| rpc_error(method, &format!("ledger index out of range: {}", n))),
        Some(Value::String(s)) => s
            .parse::<u32>()
            .map(Some)
            .map_err(|_| rpc_error(method, &format!("bad ledger index {:?}", s))),
        Some(other) => Err(rpc_error(method, &format!("bad ledger index {}", other))),
    }
}
