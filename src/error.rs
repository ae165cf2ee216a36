/// Error handling module for the gateway.
///
/// This module defines the error types used throughout the crate. Each
/// request-path variant maps to a specific HTTP status code (see the
/// `ResponseError` adapter in `server::actix_error`), and every error a
/// caller can observe is rendered as a JSON envelope.
use thiserror::Error;

/// Errors that can occur in the netviz-gateway crate.
///
/// The first eleven variants form the request-path taxonomy: they are
/// produced while validating or forwarding a single inbound request and are
/// converted to JSON error responses at the HTTP boundary. The remaining
/// variants only occur during startup.
#[derive(Error, Debug)]
pub enum Error {
    /// A required query parameter was absent or empty.
    ///
    /// This error occurs when:
    /// - `/proxy` is called without a `url` parameter
    #[error("Missing '{0}' query parameter")]
    MissingParameter(String),

    /// The proxy target does not use a permitted URL scheme.
    ///
    /// This error occurs when:
    /// - The target is `file://`, `gopher://`, or any other non-HTTP scheme
    /// - The target does not parse as a URL at all
    #[error("Only HTTP/HTTPS URLs are allowed")]
    InvalidScheme,

    /// The proxy target hostname is not on the allowlist.
    ///
    /// Carries the rejected hostname only, never the full URL, so query
    /// strings cannot leak into logs or error bodies.
    #[error("Proxy blocked: {0} is not an IONOS endpoint")]
    ForbiddenTarget(String),

    /// No auth token was supplied for a proxied call.
    ///
    /// The token is only ever read from its dedicated request header, never
    /// from the URL or query string.
    #[error("Missing X-Token header")]
    MissingCredential,

    /// The upstream response exceeded the relay size cap.
    ///
    /// No partial data is forwarded when this occurs; the caller either gets
    /// the whole body or none of it.
    #[error("Response exceeds {} MB limit", .0 / (1024 * 1024))]
    ResponseTooLarge(usize),

    /// A documentation query was submitted with an empty body.
    #[error("Request body must not be empty")]
    EmptyBody,

    /// A documentation query body exceeded its size limit.
    ///
    /// The docs channel carries small JSON-RPC envelopes only, so its limit
    /// is far below the general relay cap.
    #[error("Request body exceeds {} KB limit", .0 / 1024)]
    BodyTooLarge(usize),

    /// The upstream answered with an HTTP error status.
    ///
    /// The status code is passed through to the caller; `detail` holds a
    /// truncated excerpt of the upstream error body.
    #[error("IONOS API returned {status}")]
    UpstreamHttpError {
        /// Upstream HTTP status code, relayed as-is.
        status: u16,
        /// First 500 characters of the upstream error body.
        detail: String,
    },

    /// The upstream could not be reached at the network level.
    #[error("Could not reach IONOS API: {0}")]
    UpstreamUnreachable(String),

    /// The upstream did not answer within the request timeout.
    #[error("API request timed out")]
    UpstreamTimeout,

    /// A POST was made to a path the gateway does not implement.
    #[error("POST not supported for path '{0}'")]
    UnsupportedPath(String),

    /// A request used a method the gateway does not implement.
    #[error("Method '{0}' not supported")]
    UnsupportedMethod(String),

    /// A requested static file does not exist under the serving root.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration is invalid.
    ///
    /// This error occurs when:
    /// - The entry-point document is missing from the static root
    /// - The HTTP client cannot be constructed
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The listener could not be bound.
    ///
    /// This error occurs when:
    /// - The requested port and every fallback port are busy
    /// - The bind address does not resolve
    #[error("Failed to bind listener: {0}")]
    Bind(String),
}

/// Result type for netviz-gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
