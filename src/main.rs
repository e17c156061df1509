//! Fretquiz backend binary
//!
//! - Axum HTTP + WebSocket API
//! - Static front end fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   QUIZ_CONFIG_PATH : path to TOML config (default difficulty, seed, extra profiles)
//!   STATIC_DIR       : front-end directory (default "./static")
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use fretquiz::routes::build_router;
use fretquiz::state::AppState;
use fretquiz::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Profile catalog and the empty session store.
  let state = Arc::new(AppState::new());

  let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".into());
  let app = build_router(state.clone(), &static_dir);

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "fretquiz", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "fretquiz", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "fretquiz", error = %e, "Failed to listen for shutdown signal");
  }
}
