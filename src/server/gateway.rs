//! Gateway server startup and lifecycle.
//!
//! `Gateway::start` binds the listener (retrying successive ports when the
//! requested one is busy), wires up routes and middleware, and hands back a
//! `GatewayHandle` for shutdown. The bound port is threaded into the CORS
//! middleware explicitly; nothing reads it from ambient state.

use crate::allowlist::HostAllowlist;
use crate::config::{GatewayConfig, MAX_PORT_RETRIES};
use crate::error::{Error, Result};
use crate::relay::{http_client, McpDocsForwarder, UpstreamForwarder, MAX_RELAY_BYTES};
use crate::server::cors::CorsHeaders;
use crate::server::handlers::{self, GatewayState};
use crate::server::static_files::StaticFileServer;

use actix_web::http::Method;
use actix_web::web::{self, Data};
use actix_web::{App, HttpServer};
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::time::Duration;
use tokio::task::JoinHandle;

/// The gateway server.
pub struct Gateway;

impl Gateway {
    /// Start the gateway with the production collaborators: the default
    /// IONOS allowlist and the fixed docs endpoint.
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(config), fields(port = config.port))]
    pub async fn start(config: GatewayConfig) -> Result<GatewayHandle> {
        let client = http_client()?;
        let upstream = UpstreamForwarder::new(client.clone(), HostAllowlist::default());
        let docs = McpDocsForwarder::new(client);
        Self::start_with(config, upstream, docs).await
    }

    /// Start the gateway with explicit forwarders.
    ///
    /// Tests use this to point the gateway at local mock upstreams.
    pub async fn start_with(
        config: GatewayConfig,
        upstream: UpstreamForwarder,
        docs: McpDocsForwarder,
    ) -> Result<GatewayHandle> {
        config.validate()?;

        let listener = bind_with_retry(&config.bind_address, config.port)?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::Bind(e.to_string()))?;
        let port = addr.port();

        let state = Data::new(GatewayState {
            upstream,
            docs,
            static_files: StaticFileServer::new(&config.static_root),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(web::PayloadConfig::new(MAX_RELAY_BYTES))
                .wrap(CorsHeaders::new(port))
                .service(
                    web::resource("/health")
                        .route(web::get().to(handlers::health))
                        .route(web::method(Method::OPTIONS).to(handlers::preflight))
                        .default_service(web::to(handlers::method_not_supported)),
                )
                .service(
                    web::resource("/proxy")
                        .route(web::get().to(handlers::proxy))
                        .route(web::post().to(handlers::proxy))
                        .route(web::method(Method::OPTIONS).to(handlers::preflight))
                        .default_service(web::to(handlers::method_not_supported)),
                )
                .service(
                    web::resource("/mcp-docs")
                        .route(web::post().to(handlers::mcp_docs))
                        .route(web::method(Method::OPTIONS).to(handlers::preflight))
                        .default_service(web::to(handlers::method_not_supported)),
                )
                .default_service(web::to(handlers::fallback))
        })
        .disable_signals()
        .listen(listener)
        .map_err(|e| Error::Bind(e.to_string()))?
        .run();

        let server_handle = server.handle();
        let task = tokio::spawn(server);

        tracing::info!(address = %addr, "Gateway listening");

        Ok(GatewayHandle {
            addr,
            requested_port: config.port,
            server: server_handle,
            task,
        })
    }
}

/// Handle for a running gateway.
pub struct GatewayHandle {
    addr: SocketAddr,
    requested_port: u16,
    server: actix_web::dev::ServerHandle,
    task: JoinHandle<std::io::Result<()>>,
}

impl GatewayHandle {
    /// Address the gateway is actually bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Port the gateway is actually bound to.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Whether the gateway fell back from the requested port.
    pub fn port_fallback(&self) -> bool {
        self.requested_port != 0 && self.addr.port() != self.requested_port
    }

    /// Stop the server gracefully and wait for it to finish.
    pub async fn shutdown(self) {
        tracing::info!("Stopping gateway");
        self.server.stop(true).await;

        match tokio::time::timeout(Duration::from_secs(5), self.task).await {
            Ok(Err(e)) => tracing::warn!(error = %e, "Error while joining server task"),
            Err(_) => tracing::warn!("Timeout waiting for server task to finish"),
            Ok(Ok(_)) => tracing::info!("Gateway shut down"),
        }
    }
}

/// Bind the listener, trying successive ports when the requested one is busy.
fn bind_with_retry(bind_address: &str, requested_port: u16) -> Result<TcpListener> {
    let mut port = requested_port;
    for attempt in 0..=MAX_PORT_RETRIES {
        match TcpListener::bind((bind_address, port)) {
            Ok(listener) => {
                if attempt > 0 {
                    tracing::warn!(requested_port, bound_port = port, "Requested port was busy");
                }
                return Ok(listener);
            }
            Err(e)
                if e.kind() == ErrorKind::AddrInUse
                    && requested_port != 0
                    && attempt < MAX_PORT_RETRIES =>
            {
                match port.checked_add(1) {
                    Some(next) => {
                        tracing::warn!(port, "Port is busy, trying {}", next);
                        port = next;
                    }
                    None => return Err(Error::Bind("port range exhausted".to_string())),
                }
            }
            Err(e) => return Err(Error::Bind(format!("{}:{}: {}", bind_address, port, e))),
        }
    }
    Err(Error::Bind(format!(
        "no free port in range {}-{}",
        requested_port, port
    )))
}
