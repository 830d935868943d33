//! Read access to a ledger server's status.
//!
//! Commands only see the [`LedgerServer`] trait, so the real JSON-RPC
//! client and in-memory doubles are interchangeable.

pub mod rpc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::range::RangeSet;

pub use rpc::RpcServer;

/// Status accessors of a connected ledger server.
///
/// Each index accessor yields `None` when the server has no ledger in that
/// state (e.g. nothing validated yet).
#[async_trait]
pub trait LedgerServer: Send + Sync {
    /// Oldest complete ledger held by the server.
    async fn first(&self) -> Result<Option<u32>>;

    /// Newest complete ledger held by the server.
    async fn last(&self) -> Result<Option<u32>>;

    async fn closed(&self) -> Result<Option<u32>>;

    async fn current(&self) -> Result<Option<u32>>;

    async fn validated(&self) -> Result<Option<u32>>;

    /// Ledger ranges the server holds in full.
    async fn complete(&self) -> Result<RangeSet>;

    /// The full `server_info` snapshot.
    async fn info(&self) -> Result<Value>;
}

/// Render an optional ledger index for display.
pub fn format_index(index: Option<u32>) -> String {
    match index {
        Some(i) => i.to_string(),
        None => "none".to_string(),
    }
}
