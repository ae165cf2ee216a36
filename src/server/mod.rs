//! HTTP surface of the gateway: routing, CORS, static files, and startup.

mod actix_error;
pub mod cors;
mod gateway;
mod handlers;
mod static_files;

pub use gateway::{Gateway, GatewayHandle};
pub use static_files::StaticFileServer;
