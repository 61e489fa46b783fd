mod router;
pub mod server;
mod state;
pub mod tracing;

pub use router::build_router;
pub use state::AppState;

use crate::cache::spawn_sweeper;
use crate::config;
use crate::error::GatewayError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), GatewayError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        let probe = match config::get_configuration() {
            Ok(settings) => crate::healthcheck_with_port(settings.http_port).await,
            Err(_) => crate::healthcheck().await,
        };
        match probe {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        bind = %settings.bind_address(),
        key_policy = ?settings.key_policy,
        capacity = settings.cache_capacity,
        ttl_secs = settings.cache_ttl.as_secs(),
        "Loaded settings"
    );

    let shutdown_token = CancellationToken::new();
    let app_state = AppState::from_settings(&settings)?;

    let sweeper = spawn_sweeper(
        Arc::clone(app_state.articles.cache()),
        settings.sweep_interval,
        shutdown_token.child_token(),
    );

    let app = build_router(app_state);
    let served = server::serve(app, &settings.bind_address(), shutdown_token.clone()).await;

    // Also reached on bind failure, where no signal ever cancelled the token.
    shutdown_token.cancel();
    if let Err(e) = sweeper.await {
        ::tracing::error!("Cache sweeper task failed: {}", e);
    }
    served
}
