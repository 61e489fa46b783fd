//! The Extractor collaborator and the gateway that bounds it.

pub mod document;
pub mod gateway;
pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ParsedArticle;

pub use gateway::{ExtractorGateway, FetchError};
pub use http::HttpExtractor;

/// Upstream fetch bounds. Fixed at startup, never supplied by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl FetchPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
    pub const DEFAULT_MAX_REDIRECTS: usize = 3;
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            max_redirects: Self::DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// Why an extractor could not produce an article.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorFailure {
    #[error("exceeded {max} redirects")]
    TooManyRedirects { max: usize },

    #[error("upstream request timed out")]
    TimedOut,

    #[error("{0}")]
    Failed(String),
}

/// Fetches a URL and derives its article structure.
///
/// Implementations perform the network fetch themselves and are built with the
/// [`FetchPolicy`] whose redirect bound they must honor; the gateway enforces
/// the timeout on top.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ParsedArticle, ExtractorFailure>;
}
