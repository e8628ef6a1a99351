//! HTTP/SSE server exposing the Codepad execution core
//!
//! A thin axum layer over `codepad_core`: POST a run and receive its
//! canonical output as a server-sent event stream, compose preview documents,
//! and list the starter templates. Each editor session gets its own execution
//! router so the one-active-output invariant holds per session.

pub mod error;
pub mod routes;
pub mod sse;

pub use error::{Result, ServerError};
pub use routes::{app, AppState};

use codepad_core::PlaygroundConfig;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Bind and serve until a shutdown signal arrives.
pub async fn serve(config: PlaygroundConfig, bind_addr: SocketAddr) -> Result<()> {
    let state = AppState::new(config);
    let listener = TcpListener::bind(bind_addr).await?;
    log::info!("Codepad server listening on {}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves when the process receives Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    log::info!("Shutdown signal received");
}
