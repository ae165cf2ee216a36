//! Static asset serving for the visualizer frontend.
//!
//! The router holds this server by composition and delegates every
//! non-reserved GET path to it. Paths are percent-decoded and confined to
//! the configured root; anything that tries to climb out is a plain 404.

use crate::config::ENTRY_POINT_FILE;
use crate::error::Error;
use actix_web::{HttpResponse, ResponseError};
use std::path::{Component, Path, PathBuf};

/// Extension to content-type table for the handful of asset types the
/// frontend ships. Everything else is served as an opaque byte stream.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("js", "application/javascript"),
    ("css", "text/css"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("ico", "image/x-icon"),
    ("map", "application/json"),
    ("txt", "text/plain; charset=utf-8"),
];

/// Serves files from a fixed root directory.
#[derive(Debug, Clone)]
pub struct StaticFileServer {
    root: PathBuf,
}

impl StaticFileServer {
    /// Create a server over the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Serve the file a request path maps to.
    ///
    /// The root path (`/` or empty) is substituted with the entry-point
    /// document. Missing files and rejected paths both answer 404 with the
    /// usual JSON error envelope.
    pub async fn serve(&self, path: &str) -> HttpResponse {
        let file_path = match self.resolve(path) {
            Some(file_path) => file_path,
            None => {
                tracing::debug!(path, "Rejected static path");
                return Error::NotFound(path.to_string()).error_response();
            }
        };

        match tokio::fs::read(&file_path).await {
            Ok(bytes) => HttpResponse::Ok()
                .content_type(content_type_for(&file_path))
                .body(bytes),
            Err(err) => {
                tracing::debug!(path, error = %err, "Static file not readable");
                Error::NotFound(path.to_string()).error_response()
            }
        }
    }

    /// Resolve a URL path to a file path under the root.
    ///
    /// Returns `None` for traversal attempts or undecodable paths.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Some(self.root.join(ENTRY_POINT_FILE));
        }

        let decoded = urlencoding::decode(trimmed).ok()?;

        let mut resolved = self.root.clone();
        for component in Path::new(decoded.as_ref()).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                // CurDir segments are harmless; everything else escapes the root
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }
}

/// Look up the content type for a file by extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
        .unwrap_or("application/octet-stream")
}
