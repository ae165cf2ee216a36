//! Upstream forwarding and protocol translation.
//!
//! This is the core of the gateway: building outbound requests from inbound
//! ones, enforcing destination and size limits, and translating SSE replies
//! back into plain JSON for the frontend.

mod body;
mod docs;
mod sse;
mod types;
mod upstream;

pub use docs::McpDocsForwarder;
pub use sse::extract_last_json;
pub use types::RelayResponse;
pub use upstream::UpstreamForwarder;

use crate::error::{Error, Result};
use std::time::Duration;

/// Maximum number of upstream response bytes relayed back to a caller.
pub const MAX_RELAY_BYTES: usize = 10 * 1024 * 1024;

/// Maximum accepted `/mcp-docs` request body size. The docs channel carries
/// small JSON-RPC envelopes only.
pub const MAX_DOCS_BODY_BYTES: usize = 64 * 1024;

/// Bound on every outbound network call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed documentation-search upstream endpoint.
pub const MCP_DOCS_ENDPOINT: &str = "https://api.ionos.com/mcp";

/// Request header carrying the caller's bearer token.
pub const TOKEN_HEADER: &str = "X-Token";

/// Optional request header selecting a contract/tenant, forwarded unchanged.
pub const CONTRACT_HEADER: &str = "X-Contract-Number";

/// Session-continuation header for the docs upstream, relayed both ways.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// User agent sent on every outbound call.
pub const USER_AGENT: &str = concat!("netviz-gateway/", env!("CARGO_PKG_VERSION"));

/// Build the shared outbound HTTP client with the upstream timeout applied.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .map_err(|e| Error::ConfigInvalid(format!("Failed to build HTTP client: {}", e)))
}
