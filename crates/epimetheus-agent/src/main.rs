//! epimetheus agent
//!
//! - Load config (strict parsing + validate)
//! - Register collector families, failing fast on critical ones
//! - Serve `/metrics` until Ctrl-C, then stop samplers

use std::process::ExitCode;
use std::sync::Arc;

use epimetheus_agent::{app_state::AppState, config, host::ProcfsProvider, logging, router};
use epimetheus_core::error::{EpimetheusError, Result};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "epimetheus failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let (path, cfg) = config::load()?;
    let listen = cfg.agent.listen_addr()?;
    tracing::info!(config = %path.display(), "config loaded");

    let provider = Arc::new(ProcfsProvider::new(&cfg.agent.procfs_root));
    let (state, samplers) = AppState::start(&cfg.collectors, provider)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "epimetheus starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| EpimetheusError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| EpimetheusError::Internal(format!("server failed: {e}")))?;

    samplers.stop().await;
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => {
            tracing::warn!(error = %e, "ctrl-c handler unavailable, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
