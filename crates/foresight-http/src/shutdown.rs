//! Graceful shutdown signal handling.

use tokio::signal;
use tracing::info;

/// Resolve when SIGTERM (orchestrated termination) or SIGINT (Ctrl+C)
/// arrives. Passed to `axum::serve(...).with_graceful_shutdown(...)`.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received SIGINT, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("received SIGTERM, initiating graceful shutdown");
        },
    }
}
