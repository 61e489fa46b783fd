use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use tracing::{info, warn};

use super::error::ApiError;
use crate::app::AppState;
use crate::domain::ParsedArticle;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub ignore_cache: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkdownRequest {
    pub url: Option<String>,
}

fn required_url(url: Option<String>) -> Result<String, ApiError> {
    match url {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(ApiError::Validation("url is required".into())),
    }
}

/// Handler for POST /parse
pub async fn parse_handler(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParsedArticle>, ApiError> {
    let Json(request) = payload?;
    let url = required_url(request.url)?;
    info!(url = %url, ignore_cache = request.ignore_cache, "Parse requested");

    match state.articles.get_article(&url, request.ignore_cache).await {
        Ok(article) => Ok(Json(ParsedArticle::clone(&article))),
        Err(e) => {
            warn!(url = %url, error = %e, "Parse failed");
            Err(e.into())
        }
    }
}

/// Handler for POST /parse/md
pub async fn parse_markdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<MarkdownRequest>, JsonRejection>,
) -> Result<Json<ParsedArticle>, ApiError> {
    let Json(request) = payload?;
    let url = required_url(request.url)?;
    info!(url = %url, "Markdown parse requested");

    match state.markdown.get_article_markdown(&url).await {
        Ok(article) => Ok(Json(article)),
        Err(e) => {
            warn!(url = %url, error = %e, "Markdown parse failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_rejected() {
        assert!(required_url(None).is_err());
        assert!(required_url(Some("  ".into())).is_err());
        assert_eq!(required_url(Some("https://x".into())).unwrap(), "https://x");
    }

    #[test]
    fn ignore_cache_defaults_to_false() {
        let request: ParseRequest = serde_json::from_str(r#"{"url":"https://x"}"#).unwrap();
        assert!(!request.ignore_cache);
    }
}
