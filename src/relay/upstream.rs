//! REST proxy forwarding to the cloud API.
//!
//! One forwarder instance is shared by all workers. It owns the destination
//! allowlist and the HTTP client (configured once with the upstream timeout);
//! each inbound call builds a fresh outbound request from its own data, so no
//! per-request state is shared.

use crate::allowlist::HostAllowlist;
use crate::error::{Error, Result};
use crate::relay::body::{map_transport_error, read_bounded, read_upstream_error};
use crate::relay::types::{relay_status, RelayResponse};
use crate::relay::{CONTRACT_HEADER, MAX_RELAY_BYTES, USER_AGENT};

use actix_web::http::Method;
use actix_web::web::Bytes;
use url::Url;

/// Forwards REST-style proxy calls to allow-listed upstream hosts.
#[derive(Clone)]
pub struct UpstreamForwarder {
    client: reqwest::Client,
    allowlist: HostAllowlist,
}

impl UpstreamForwarder {
    /// Create a forwarder over an existing client and allowlist.
    pub fn new(client: reqwest::Client, allowlist: HostAllowlist) -> Self {
        Self { client, allowlist }
    }

    /// Forward one inbound proxy call and relay the upstream response.
    ///
    /// Preconditions are checked in order, first failure short-circuits:
    /// a non-empty `url` parameter, an HTTP(S) scheme, an allow-listed
    /// hostname, and a token. Exactly one outbound call is made, with no
    /// retries; upstream failures are surfaced, not masked.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip_all, fields(method = %method))]
    pub async fn forward(
        &self,
        method: Method,
        target_url: Option<&str>,
        token: Option<&str>,
        contract_number: Option<&str>,
        body: Option<Bytes>,
    ) -> Result<RelayResponse> {
        let raw = target_url.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(Error::MissingParameter("url".to_string()));
        }

        let target = self.validate_target(raw)?;

        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(Error::MissingCredential),
        };

        tracing::debug!(
            target_host = %target.host_str().unwrap_or_default(),
            target_path = %target.path(),
            "Forwarding request upstream"
        );

        let mut request = if method == Method::POST {
            let mut post = self.client.post(target.as_str());
            if let Some(body) = body {
                post = post.body(body);
            }
            post
        } else {
            self.client.get(target.as_str())
        };

        request = request
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        if let Some(contract) = contract_number {
            request = request.header(CONTRACT_HEADER, contract);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(read_upstream_error(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        let body = read_bounded(response, MAX_RELAY_BYTES).await?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Relaying upstream response");

        Ok(RelayResponse {
            status: relay_status(status.as_u16()),
            content_type,
            body,
            session_id: None,
        })
    }

    /// Validate a raw `url` parameter into a permitted upstream target.
    ///
    /// The allowlist only ever sees the parsed hostname component, so
    /// scheme or userinfo confusion in the raw string cannot bypass it.
    fn validate_target(&self, raw: &str) -> Result<Url> {
        let target = Url::parse(raw).map_err(|_| Error::InvalidScheme)?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(Error::InvalidScheme);
        }

        let host = target.host_str().unwrap_or_default().to_ascii_lowercase();
        if !self.allowlist.is_allowed(&host) {
            tracing::warn!(target_host = %host, "Rejected proxy target");
            return Err(Error::ForbiddenTarget(host));
        }

        Ok(target)
    }
}
