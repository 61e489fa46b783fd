use axum::Router;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::GatewayError;

/// Serve `app` on `bind_addr` until SIGINT/SIGTERM.
///
/// `shutdown_token` is cancelled once a signal arrives so background tasks
/// (the cache sweeper) stop alongside the server.
pub async fn serve(
    app: Router,
    bind_addr: &str,
    shutdown_token: CancellationToken,
) -> Result<(), GatewayError> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| GatewayError::Bind {
            address: bind_addr.to_string(),
            source: e,
        })?;
    info!("Server listening on {}", listener.local_addr()?);
    info!("  - GET  /health/check  (liveness)");
    info!("  - POST /parse         (article as HTML)");
    info!("  - POST /parse/md      (article as Markdown)");

    let token = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                () = shutdown_signal() => token.cancel(),
                () = token.cancelled() => {}
            }
        })
        .await?;

    shutdown_token.cancel();
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
