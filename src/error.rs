use thiserror::Error;

use crate::cache::CacheError;

/// Startup and server-level failures. Request-time failures live with the
/// layer that produces them (`FetchError`, `MarkdownError`, `ApiError`).
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Invalid cache configuration: {0}")]
    Cache(#[from] CacheError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}
