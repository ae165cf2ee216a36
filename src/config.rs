//! Configuration for the gateway process.
//!
//! Everything here is decided once at startup (normally from the CLI) and
//! read-only afterwards. The actually-bound port is not part of this struct:
//! it is only known after the bind succeeds and is handed to the router and
//! CORS policy explicitly at construction time.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address. Localhost only; the gateway fronts credentials and
/// should not be reachable from other machines unless explicitly requested.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Entry-point document served for `GET /`.
pub const ENTRY_POINT_FILE: &str = "network-visualizer.html";

/// How many successive ports to try when the requested one is busy.
pub const MAX_PORT_RETRIES: u16 = 10;

/// Process-wide gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Port to listen on. When busy, the next ports are tried, up to
    /// [`MAX_PORT_RETRIES`] increments. Port 0 asks the OS for any free port.
    pub port: u16,

    /// Address to bind the listener to.
    pub bind_address: String,

    /// Directory the visualizer frontend is served from.
    pub static_root: PathBuf,

    /// Whether to launch the platform browser after startup.
    pub open_browser: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND.to_string(),
            static_root: PathBuf::from("."),
            open_browser: true,
        }
    }
}

impl GatewayConfig {
    /// Check that the configuration describes a servable frontend.
    ///
    /// The gateway exists to serve the visualizer, so a missing entry-point
    /// document is a startup error rather than a per-request 404.
    pub fn validate(&self) -> Result<()> {
        let entry = self.static_root.join(ENTRY_POINT_FILE);
        if !entry.is_file() {
            return Err(Error::ConfigInvalid(format!(
                "{} not found in {}",
                ENTRY_POINT_FILE,
                self.static_root.display()
            )));
        }
        Ok(())
    }
}
