//! Bounded body reads and upstream failure mapping shared by the forwarders.

use crate::error::Error;
use actix_web::web::Bytes;
use futures::StreamExt;

/// How many bytes of an upstream error body are read before truncation.
const ERROR_DETAIL_READ_BYTES: usize = 2048;

/// How many characters of that excerpt end up in the JSON `detail` field.
const ERROR_DETAIL_MAX_CHARS: usize = 500;

/// Accumulate a response body, aborting as soon as it would exceed `limit`.
///
/// Reading stops on the first byte past the limit, so at most `limit + 1`
/// bytes are ever buffered and nothing is relayed once the cap is crossed.
pub(crate) async fn read_bounded(
    response: reqwest::Response,
    limit: usize,
) -> Result<Bytes, Error> {
    let mut stream = response.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_transport_error)?;
        if buf.len() + chunk.len() > limit {
            tracing::warn!(limit, "Upstream response exceeded relay cap, aborting");
            return Err(Error::ResponseTooLarge(limit));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Bytes::from(buf))
}

/// Convert an upstream HTTP error into a passthrough error carrying a
/// truncated excerpt of the upstream body.
pub(crate) async fn read_upstream_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let detail = match read_prefix(response, ERROR_DETAIL_READ_BYTES).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .chars()
            .take(ERROR_DETAIL_MAX_CHARS)
            .collect(),
        Err(_) => "(unable to read error response)".to_string(),
    };
    Error::UpstreamHttpError { status, detail }
}

/// Read up to `limit` bytes of a body, discarding the rest.
async fn read_prefix(response: reqwest::Response, limit: usize) -> reqwest::Result<Vec<u8>> {
    let mut stream = response.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = limit - buf.len();
        if chunk.len() >= remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

/// Map a transport-level client error onto the gateway taxonomy.
pub(crate) fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        return Error::UpstreamTimeout;
    }
    // Strip the URL from the message: proxied targets carry caller-supplied
    // query strings that must not end up in logs or error bodies.
    Error::UpstreamUnreachable(err.without_url().to_string())
}
