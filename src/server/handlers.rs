//! HTTP request handlers for the gateway endpoints.
//!
//! Handlers are infallible at the actix layer: forwarding failures are
//! converted to their JSON response right here, so success and error replies
//! alike flow back through the CORS middleware.

use crate::error::{Error, Result};
use crate::relay::{
    McpDocsForwarder, RelayResponse, UpstreamForwarder, CONTRACT_HEADER, SESSION_HEADER,
    TOKEN_HEADER,
};
use crate::server::static_files::StaticFileServer;

use actix_web::http::Method;
use actix_web::web::{self, Bytes, Data};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use std::collections::HashMap;

/// Shared state handed to every handler.
pub(crate) struct GatewayState {
    pub upstream: UpstreamForwarder,
    pub docs: McpDocsForwarder,
    pub static_files: StaticFileServer,
}

/// `GET /health`: liveness probe. Always succeeds, no side effects.
pub(crate) async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// `GET or POST /proxy`: forward a REST call to an allow-listed upstream.
pub(crate) async fn proxy(
    state: Data<GatewayState>,
    req: HttpRequest,
    body: Bytes,
) -> HttpResponse {
    // A malformed query string is treated as an absent `url` parameter
    let query: HashMap<String, String> = web::Query::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    let method = req.method().clone();
    let body = if method == Method::POST { Some(body) } else { None };

    respond(
        state
            .upstream
            .forward(
                method,
                query.get("url").map(String::as_str),
                header_value(&req, TOKEN_HEADER),
                header_value(&req, CONTRACT_HEADER),
                body,
            )
            .await,
    )
}

/// `POST /mcp-docs`: forward a JSON-RPC documentation query.
pub(crate) async fn mcp_docs(
    state: Data<GatewayState>,
    req: HttpRequest,
    body: Bytes,
) -> HttpResponse {
    respond(
        state
            .docs
            .forward_docs_query(body, header_value(&req, SESSION_HEADER))
            .await,
    )
}

/// `OPTIONS`: CORS preflight. Empty body; the middleware adds the headers.
pub(crate) async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Unlisted method on a reserved path. Reserved paths shadow static files,
/// so this never falls through to the file collaborator.
pub(crate) async fn method_not_supported(req: HttpRequest) -> HttpResponse {
    Error::UnsupportedMethod(req.method().to_string()).error_response()
}

/// Dispatch for every path without a reserved route.
///
/// GET falls through to the static collaborator, OPTIONS is a preflight,
/// and anything else is explicitly unimplemented.
pub(crate) async fn fallback(state: Data<GatewayState>, req: HttpRequest) -> HttpResponse {
    let method = req.method();
    if method == Method::OPTIONS {
        preflight().await
    } else if method == Method::GET {
        state.static_files.serve(req.path()).await
    } else if method == Method::POST {
        tracing::debug!(path = %req.path(), "POST to unsupported path");
        Error::UnsupportedPath(req.path().to_string()).error_response()
    } else {
        Error::UnsupportedMethod(method.to_string()).error_response()
    }
}

/// Read a request header as a string, ignoring undecodable values.
fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Convert a forwarding result into the HTTP reply.
fn respond(result: Result<RelayResponse>) -> HttpResponse {
    match result {
        Ok(relay) => relay.into_http_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Request failed");
            err.error_response()
        }
    }
}
