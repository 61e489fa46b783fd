use axum::Router;
use axum::routing::{get, post};

use super::AppState;
use crate::handler::health::{health_handler, root_handler};
use crate::handler::parse::{parse_handler, parse_markdown_handler};

/// Build the HTTP router over `state`.
pub fn build_router(state: AppState) -> Router {
    let health_router = Router::new()
        .route("/", get(root_handler))
        .route("/health/check", get(health_handler));

    let parse_router = Router::new()
        .route("/parse", post(parse_handler))
        .route("/parse/md", post(parse_markdown_handler))
        .with_state(state);

    Router::new().merge(health_router).merge(parse_router)
}
