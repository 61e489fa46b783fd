//! Shared test support utilities
//!
//! Stub collaborators that count their invocations, for use in unit and
//! integration tests.

use crate::domain::{ParsedArticle, TextDirection};
use crate::extractor::{Extractor, ExtractorFailure};
use crate::markdown::{ConvertError, HtmlConverter};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A complete article for `url` with `<p>Hi</p>` as its content.
pub fn sample_article(url: &str) -> ParsedArticle {
    ParsedArticle {
        title: "Sample article".to_string(),
        author: Some("Test Author".to_string()),
        date_published: None,
        dek: None,
        lead_image_url: None,
        content: "<p>Hi</p>".to_string(),
        next_page_url: None,
        url: url.to_string(),
        domain: url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default(),
        excerpt: "Hi".to_string(),
        word_count: 1,
        direction: TextDirection::Ltr,
        total_pages: 1,
        rendered_pages: 1,
    }
}

/// Extractor returning a fixed outcome, optionally after a delay.
pub struct StubExtractor {
    outcome: Mutex<Result<ParsedArticle, ExtractorFailure>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl StubExtractor {
    pub fn returning(article: ParsedArticle) -> Self {
        Self::with_outcome(Ok(article))
    }

    pub fn failing(failure: ExtractorFailure) -> Self {
        Self::with_outcome(Err(failure))
    }

    fn with_outcome(outcome: Result<ParsedArticle, ExtractorFailure>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            delay: None,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the outcome returned by subsequent calls.
    pub fn set_outcome(&self, outcome: Result<ParsedArticle, ExtractorFailure>) {
        *self.outcome.lock() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self, url: &str) -> Result<ParsedArticle, ExtractorFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.lock().clone()
    }
}

/// Converter that strips tags and counts invocations.
#[derive(Default)]
pub struct CountingConverter {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HtmlConverter for CountingConverter {
    fn convert(&self, html: &str) -> Result<String, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConvertError("stub converter failure".to_string()));
        }
        let mut text = String::with_capacity(html.len());
        let mut in_tag = false;
        for c in html.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(c),
                _ => {}
            }
        }
        Ok(text)
    }
}
