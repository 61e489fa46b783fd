use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, redirect};
use tracing::debug;

use super::document::extract_article;
use super::{Extractor, ExtractorFailure, FetchPolicy};
use crate::domain::ParsedArticle;

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (compatible; article-gateway/",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Default [`Extractor`]: fetches the page over HTTP and extracts the article
/// from its HTML.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: Client,
    max_redirects: usize,
}

impl HttpExtractor {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(policy: &FetchPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(policy.timeout)
            .redirect(redirect::Policy::limited(policy.max_redirects))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            max_redirects: policy.max_redirects,
        })
    }

    fn classify(&self, error: &reqwest::Error) -> ExtractorFailure {
        if error.is_redirect() {
            ExtractorFailure::TooManyRedirects {
                max: self.max_redirects,
            }
        } else if error.is_timeout() {
            ExtractorFailure::TimedOut
        } else {
            ExtractorFailure::Failed(format!("request failed: {error}"))
        }
    }
}

#[async_trait]
impl Extractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Result<ParsedArticle, ExtractorFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractorFailure::Failed(format!(
                "upstream returned status {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_ascii_lowercase();
        if !is_html(&content_type) {
            return Err(ExtractorFailure::Failed(format!(
                "unsupported content type {content_type}"
            )));
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| self.classify(&e))?;
        debug!(url, final_url = %final_url, bytes = body.len(), "Fetched upstream document");

        extract_article(&body, &final_url)
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    mime == "text/html" || mime == "application/xhtml+xml"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_html_content_types() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("application/xhtml+xml"));
        assert!(!is_html("application/json"));
        assert!(!is_html("image/png"));
    }

    #[test]
    fn builds_with_default_policy() {
        let extractor = HttpExtractor::new(&FetchPolicy::default()).unwrap();
        assert_eq!(extractor.max_redirects, 3);
    }
}
