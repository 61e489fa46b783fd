//! Markdown view over canonical cached articles.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::domain::ParsedArticle;
use crate::extractor::FetchError;
use crate::service::ArticleService;

/// Wrap width handed to `html2text`; wide enough that paragraphs stay on one line.
const WRAP_WIDTH: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTML to Markdown conversion failed: {0}")]
pub struct ConvertError(pub String);

/// HTML fragment to Markdown text.
pub trait HtmlConverter: Send + Sync {
    /// # Errors
    /// Returns a [`ConvertError`] when the fragment cannot be rendered.
    fn convert(&self, html: &str) -> Result<String, ConvertError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Html2TextConverter;

impl HtmlConverter for Html2TextConverter {
    fn convert(&self, html: &str) -> Result<String, ConvertError> {
        let rendered = html2text::from_read(html.as_bytes(), WRAP_WIDTH)
            .map_err(|e| ConvertError(e.to_string()))?;
        let lines: Vec<&str> = rendered.lines().map(str::trim_end).collect();
        Ok(lines.join("\n").trim().to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkdownError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Derives Markdown from the canonical entry on every call; the conversion is
/// never cached.
#[derive(Clone)]
pub struct MarkdownView {
    articles: Arc<ArticleService>,
    converter: Arc<dyn HtmlConverter>,
}

impl MarkdownView {
    pub fn new(articles: Arc<ArticleService>, converter: Arc<dyn HtmlConverter>) -> Self {
        Self {
            articles,
            converter,
        }
    }

    /// The canonical article for `url` with `content` converted to Markdown.
    ///
    /// Always goes through the cache-enabled path, so a miss warms the
    /// canonical entry exactly like a non-bypassed `get_article`.
    ///
    /// # Errors
    /// Propagates gateway failures unchanged and reports converter failures.
    pub async fn get_article_markdown(&self, url: &str) -> Result<ParsedArticle, MarkdownError> {
        let canonical = self.articles.get_article(url, false).await?;
        let markdown = self.converter.convert(&canonical.content)?;
        debug!(
            url,
            html_bytes = canonical.content.len(),
            markdown_bytes = markdown.len(),
            "Converted article content to Markdown"
        );
        Ok(canonical.with_content(markdown))
    }
}
