//! CORS policy scoped to localhost browser callers.
//!
//! Credentials flow through this gateway, so the allowed origin is never a
//! wildcard: a localhost origin is echoed back exactly, anything else falls
//! back to the gateway's own origin. The middleware stamps the headers on
//! every response, error replies included, which is why the handlers convert
//! failures to responses instead of propagating actix errors past it.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error as ActixError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::relay::SESSION_HEADER;

/// Methods the gateway accepts.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Request headers a browser may send cross-origin.
pub const ALLOWED_HEADERS: &str =
    "Content-Type, X-Token, Authorization, X-Contract-Number, Mcp-Session-Id";

/// Response headers browser code may read cross-origin. The session id must
/// stay listed here or the frontend cannot continue a docs session.
pub const EXPOSED_HEADERS: &str = SESSION_HEADER;

/// Compute the `Access-Control-Allow-Origin` value for a request.
///
/// Localhost origins are echoed back exactly; no origin header (same-process
/// or non-browser callers) and foreign origins both fall back to the
/// gateway's own origin on the bound port.
pub fn allow_origin(origin: Option<&str>, port: u16) -> String {
    match origin {
        Some(origin)
            if origin.starts_with("http://localhost:")
                || origin.starts_with("http://127.0.0.1:") =>
        {
            origin.to_string()
        }
        _ => format!("http://localhost:{}", port),
    }
}

/// Middleware factory stamping the gateway's CORS headers on every response.
pub struct CorsHeaders {
    port: u16,
}

impl CorsHeaders {
    /// Create the middleware for a gateway bound to `port`.
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Transform = CorsHeadersMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsHeadersMiddleware {
            service,
            port: self.port,
        }))
    }
}

/// CORS middleware implementation.
pub struct CorsHeadersMiddleware<S> {
    service: S,
    port: u16,
}

impl<S, B> Service<ServiceRequest> for CorsHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let port = self.port;

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;

            let headers = res.headers_mut();
            if let Ok(value) = HeaderValue::from_str(&allow_origin(origin.as_deref(), port)) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            );
            headers.insert(
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static(EXPOSED_HEADERS),
            );

            Ok(res)
        })
    }
}
