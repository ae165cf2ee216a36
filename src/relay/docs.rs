//! Forwarding for the documentation-search JSON-RPC upstream.
//!
//! The docs upstream speaks JSON-RPC over HTTP but is free to answer either
//! as plain JSON or as an SSE event stream. Callers never see the transport:
//! SSE replies are reduced to their final JSON payload and everything goes
//! back out declared as `application/json`.

use crate::error::{Error, Result};
use crate::relay::body::{map_transport_error, read_bounded, read_upstream_error};
use crate::relay::sse::extract_last_json;
use crate::relay::types::{relay_status, RelayResponse};
use crate::relay::{MAX_DOCS_BODY_BYTES, MAX_RELAY_BYTES, MCP_DOCS_ENDPOINT, SESSION_HEADER, USER_AGENT};

use actix_web::web::Bytes;

/// Forwards documentation queries to the fixed docs endpoint.
#[derive(Clone)]
pub struct McpDocsForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl McpDocsForwarder {
    /// Create a forwarder targeting the fixed documentation endpoint.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: MCP_DOCS_ENDPOINT.to_string(),
        }
    }

    /// Create a forwarder targeting a different endpoint. Primarily for
    /// tests, which point the forwarder at a local mock upstream.
    pub fn with_endpoint(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Forward one JSON-RPC documentation query.
    ///
    /// The body is forwarded opaquely; a session-continuation id is passed
    /// along when the caller supplies one, and a fresh id issued by the
    /// upstream is relayed back via the response.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip_all, fields(body_len = body.len()))]
    pub async fn forward_docs_query(
        &self,
        body: Bytes,
        session_id: Option<&str>,
    ) -> Result<RelayResponse> {
        if body.is_empty() {
            return Err(Error::EmptyBody);
        }
        if body.len() > MAX_DOCS_BODY_BYTES {
            return Err(Error::BodyTooLarge(MAX_DOCS_BODY_BYTES));
        }

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(body);
        if let Some(session_id) = session_id {
            request = request.header(SESSION_HEADER, session_id);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(read_upstream_error(response).await);
        }

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        let is_event_stream = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|content_type| content_type.starts_with("text/event-stream"))
            .unwrap_or(false);

        let raw = read_bounded(response, MAX_RELAY_BYTES).await?;

        let body = if is_event_stream {
            tracing::debug!(raw_len = raw.len(), "Extracting JSON payload from SSE reply");
            Bytes::from(extract_last_json(&raw))
        } else {
            raw
        };

        Ok(RelayResponse {
            status: relay_status(status.as_u16()),
            content_type: "application/json".to_string(),
            body,
            session_id,
        })
    }
}
