//! NetViz Gateway binary.
//!
//! Serves the network visualizer frontend and proxies its API calls to the
//! IONOS Cloud endpoints. Run it next to `network-visualizer.html` and open
//! the printed URL in a browser.

use clap::Parser;
use netviz_gateway::config::{DEFAULT_BIND, DEFAULT_PORT};
use netviz_gateway::{Gateway, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Local gateway for the IONOS Cloud network visualizer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on; the next ports are tried automatically when busy
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = DEFAULT_BIND)]
    bind: String,

    /// Directory containing the visualizer frontend
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Don't auto-open the browser
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig {
        port: cli.port,
        bind_address: cli.bind,
        static_root: cli.root,
        open_browser: !cli.no_browser,
    };

    let requested_port = config.port;
    let open_browser = config.open_browser;

    let handle = Gateway::start(config).await?;
    let url = format!("http://localhost:{}", handle.port());

    print_banner(&url, handle.port_fallback().then_some(requested_port));

    if open_browser {
        launch_browser(&url);
    }

    tokio::signal::ctrl_c().await?;
    println!("\n  Shutting down...");
    handle.shutdown().await;

    Ok(())
}

/// Print the startup banner with the bound URL.
fn print_banner(url: &str, busy_port: Option<u16>) {
    println!();
    println!("  ╔═══════════════════════════════════════════════════╗");
    println!("  ║     IONOS Cloud Network Visualizer                ║");
    println!("  ╠═══════════════════════════════════════════════════╣");
    println!("  ║  Running at: {:<36} ║", url);
    if let Some(port) = busy_port {
        println!("  ║  {:<49} ║", format!("(port {} was busy)", port));
    }
    println!("  ║  Press Ctrl+C to stop                             ║");
    println!("  ╚═══════════════════════════════════════════════════╝");
    println!();
}

/// Best-effort launch of the platform browser opener.
fn launch_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let opener = "xdg-open";

    if let Err(err) = std::process::Command::new(opener).arg(url).spawn() {
        tracing::warn!(error = %err, "Could not open browser automatically");
    }
}
