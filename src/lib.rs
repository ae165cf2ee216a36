/*!
 # NetViz Gateway

 A local HTTP gateway for the IONOS Cloud network visualizer.

 ## Overview

 Browsers cannot call the IONOS Cloud APIs directly from a page served off
 `localhost`: the same-origin policy blocks the request, and putting a bearer
 token into a visible request URL is not acceptable. This crate provides:

 - A static file server for the visualizer single-page application
 - A `/proxy` endpoint that forwards REST calls to allow-listed IONOS hosts,
   moving the caller's token into an `Authorization` header
 - A `/mcp-docs` endpoint that forwards JSON-RPC documentation queries to an
   upstream that may answer over Server-Sent Events, translating the reply
   back to plain JSON
 - A CORS policy scoped to localhost origins only

 ## Basic Usage

 ```no_run
 use netviz_gateway::{Gateway, GatewayConfig, Result};

 #[tokio::main]
 async fn main() -> Result<()> {
     let config = GatewayConfig::default();
     let handle = Gateway::start(config).await?;

     println!("listening on http://localhost:{}", handle.port());

     tokio::signal::ctrl_c().await.ok();
     handle.shutdown().await;
     Ok(())
 }
 ```

 ## Features

 - **Host Allow-listing**: outbound targets are restricted to the configured
   API domains; everything else is rejected before a connection is opened
 - **Bounded Relay**: upstream responses are read fully, size-checked against
   a 10 MiB cap, and only then written back to the caller
 - **SSE Extraction**: multi-event SSE replies are reduced to their last
   well-formed JSON payload
 - **Error Handling**: every failure is reported as a JSON envelope with an
   appropriate HTTP status; a bad request never takes down the listener
*/

pub mod allowlist;
pub mod config;
pub mod error;
pub mod relay;
pub mod server;

pub use allowlist::HostAllowlist;
pub use config::GatewayConfig;
pub use error::{Error, Result};
pub use server::{Gateway, GatewayHandle};
