use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::{Extractor, ExtractorFailure, FetchPolicy};
use crate::domain::ParsedArticle;

/// Terminal failure of one gateway fetch. Cloneable so coalesced waiters can
/// all receive the same outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("fetching {url} did not complete within {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u128 },

    #[error("fetching {url} exceeded the limit of {max} redirects")]
    RedirectLimit { url: String, max: usize },

    #[error("could not extract an article from {url}: {reason}")]
    Extraction { url: String, reason: String },
}

impl FetchError {
    /// Stable identifier used in API error bodies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout_error",
            Self::RedirectLimit { .. } => "redirect_limit_error",
            Self::Extraction { .. } => "extraction_error",
        }
    }
}

/// Wraps an [`Extractor`] with the timeout/redirect policy and classifies its
/// failures. No retries: every failure is returned to the caller as-is.
#[derive(Clone)]
pub struct ExtractorGateway {
    extractor: Arc<dyn Extractor>,
    policy: FetchPolicy,
}

impl ExtractorGateway {
    pub fn new(extractor: Arc<dyn Extractor>, policy: FetchPolicy) -> Self {
        Self { extractor, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// # Errors
    /// Returns a [`FetchError`] when the extractor fails, follows too many
    /// redirects, or does not finish within the policy timeout.
    pub async fn fetch(&self, url: &str) -> Result<ParsedArticle, FetchError> {
        debug!(url, "Fetching article from upstream");
        let outcome = tokio::time::timeout(self.policy.timeout, self.extractor.extract(url)).await;

        let result = match outcome {
            Ok(Ok(article)) => Ok(article),
            Ok(Err(failure)) => Err(self.classify(url, failure)),
            Err(_elapsed) => Err(self.timeout_error(url)),
        };
        if let Err(error) = &result {
            warn!(url, kind = error.kind(), %error, "Upstream fetch failed");
        }
        result
    }

    fn classify(&self, url: &str, failure: ExtractorFailure) -> FetchError {
        match failure {
            ExtractorFailure::TooManyRedirects { max } => FetchError::RedirectLimit {
                url: url.to_string(),
                max,
            },
            ExtractorFailure::TimedOut => self.timeout_error(url),
            ExtractorFailure::Failed(reason) => FetchError::Extraction {
                url: url.to_string(),
                reason,
            },
        }
    }

    fn timeout_error(&self, url: &str) -> FetchError {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: self.policy.timeout.as_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubExtractor, sample_article};
    use std::time::Duration;

    fn build_gateway(extractor: StubExtractor) -> (Arc<StubExtractor>, ExtractorGateway) {
        let extractor = Arc::new(extractor);
        let policy = FetchPolicy {
            timeout: Duration::from_millis(100),
            max_redirects: 3,
        };
        let gateway = ExtractorGateway::new(extractor.clone(), policy);
        (extractor, gateway)
    }

    #[tokio::test]
    async fn passes_successful_extraction_through() {
        let (stub, gateway) = build_gateway(StubExtractor::returning(sample_article("https://x/1")));
        let article = gateway.fetch("https://x/1").await.unwrap();
        assert_eq!(article.url, "https://x/1");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_extractor_times_out() {
        let (_, gateway) = build_gateway(
            StubExtractor::returning(sample_article("https://x/slow"))
                .with_delay(Duration::from_secs(5)),
        );
        let error = gateway.fetch("https://x/slow").await.unwrap_err();
        assert_eq!(
            error,
            FetchError::Timeout {
                url: "https://x/slow".into(),
                timeout_ms: 100
            }
        );
        assert_eq!(error.kind(), "timeout_error");
    }

    #[tokio::test]
    async fn classifies_extractor_failures() {
        let (_, gateway) = build_gateway(StubExtractor::failing(ExtractorFailure::TooManyRedirects {
            max: 3,
        }));
        assert!(matches!(
            gateway.fetch("https://x/r").await,
            Err(FetchError::RedirectLimit { max: 3, .. })
        ));

        let (_, gateway) = build_gateway(StubExtractor::failing(ExtractorFailure::TimedOut));
        assert!(matches!(
            gateway.fetch("https://x/t").await,
            Err(FetchError::Timeout { .. })
        ));

        let (stub, gateway) = build_gateway(StubExtractor::failing(ExtractorFailure::Failed(
            "not an article".into(),
        )));
        let error = gateway.fetch("https://x/e").await.unwrap_err();
        assert_eq!(error.kind(), "extraction_error");
        assert!(error.to_string().contains("not an article"));
        assert_eq!(stub.calls(), 1, "no internal retry");
    }
}
