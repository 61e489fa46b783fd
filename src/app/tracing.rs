use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber: JSON lines unless `RUST_LOG_FORMAT` names
/// another format, filtered by `RUST_LOG` on top of an INFO floor.
pub fn init_tracing() {
    let use_json = std::env::var("RUST_LOG_FORMAT").map_or(true, |v| v == "json");
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());

    if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }
}
