//! Shared helpers for the gateway integration tests.
//!
//! These tests exercise the full HTTP stack: a real gateway bound to an
//! ephemeral loopback port, driven with a plain reqwest client.

use actix_web::{web, App, HttpServer};
use netviz_gateway::config::ENTRY_POINT_FILE;
use netviz_gateway::relay::{http_client, McpDocsForwarder, UpstreamForwarder};
use netviz_gateway::{Gateway, GatewayConfig, GatewayHandle, HostAllowlist};
use std::net::TcpListener;
use std::path::Path;
use tempfile::TempDir;

/// A running gateway plus the temp directory its frontend lives in.
pub struct TestGateway {
    pub handle: GatewayHandle,
    pub base_url: String,
    root: TempDir,
}

impl TestGateway {
    /// Directory the gateway serves static files from.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }
}

/// Start a gateway with the production collaborators on an ephemeral port.
pub async fn start_gateway() -> TestGateway {
    start_custom(HostAllowlist::default(), None).await
}

/// Start a gateway whose proxy allowlist admits the loopback mock upstreams.
pub async fn start_gateway_with(allowlist: HostAllowlist) -> TestGateway {
    start_custom(allowlist, None).await
}

/// Start a gateway whose docs forwarder targets a mock endpoint.
pub async fn start_gateway_with_docs(endpoint: &str) -> TestGateway {
    start_custom(HostAllowlist::default(), Some(endpoint.to_string())).await
}

async fn start_custom(allowlist: HostAllowlist, docs_endpoint: Option<String>) -> TestGateway {
    let root = TempDir::new().expect("create temp static root");
    write_frontend(root.path());

    let config = GatewayConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        static_root: root.path().to_path_buf(),
        open_browser: false,
    };

    let client = http_client().expect("build client");
    let upstream = UpstreamForwarder::new(client.clone(), allowlist);
    let docs = match docs_endpoint {
        Some(endpoint) => McpDocsForwarder::with_endpoint(client, endpoint),
        None => McpDocsForwarder::new(client),
    };

    let handle = Gateway::start_with(config, upstream, docs)
        .await
        .expect("start gateway");
    let base_url = format!("http://127.0.0.1:{}", handle.port());

    TestGateway {
        handle,
        base_url,
        root,
    }
}

/// Spawn a mock upstream on an ephemeral loopback port, returning its base
/// URL. The listener is bound before this returns, so requests issued right
/// away are queued rather than refused.
pub async fn spawn_upstream<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock upstream");
    let port = listener.local_addr().expect("mock upstream addr").port();

    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .disable_signals()
        .listen(listener)
        .expect("listen mock upstream")
        .run();
    tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

/// Write a minimal frontend into `dir`: the entry-point document plus one
/// script asset.
pub fn write_frontend(dir: &Path) {
    std::fs::write(
        dir.join(ENTRY_POINT_FILE),
        "<!doctype html><html><head><title>Network Visualizer</title></head></html>",
    )
    .expect("write entry point");
    std::fs::write(dir.join("app.js"), "console.log('viz');")
        .expect("write script asset");
}
