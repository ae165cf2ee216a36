//! Data types shared by the forwarders.

use crate::relay::SESSION_HEADER;
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::HttpResponse;

/// Exactly what is written back to the caller for one relayed upstream call.
///
/// The body is complete and size-checked by the time this struct exists; a
/// response that failed the relay cap never gets this far.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// Status code relayed from the upstream.
    pub status: StatusCode,
    /// Content type declared to the caller.
    pub content_type: String,
    /// Response body, bounded by [`crate::relay::MAX_RELAY_BYTES`].
    pub body: Bytes,
    /// Session id to surface via the `Mcp-Session-Id` response header.
    pub session_id: Option<String>,
}

impl RelayResponse {
    /// Convert into the HTTP response written to the caller.
    pub fn into_http_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        builder.content_type(self.content_type);
        if let Some(session_id) = self.session_id {
            builder.append_header((SESSION_HEADER, session_id));
        }
        builder.body(self.body)
    }
}

/// Map an upstream status code onto the caller-facing response status.
pub(crate) fn relay_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
