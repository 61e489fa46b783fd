use std::sync::Arc;

use crate::config::Settings;
use crate::error::GatewayError;
use crate::extractor::{Extractor, ExtractorGateway, HttpExtractor};
use crate::markdown::{Html2TextConverter, HtmlConverter, MarkdownView};
use crate::service::{ArticleCache, ArticleService};

/// Shared handler state. Each instance owns its own cache, so separately built
/// states never observe each other's entries.
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<ArticleService>,
    pub markdown: Arc<MarkdownView>,
}

impl AppState {
    /// Wire the production collaborators: the HTTP extractor and `html2text`.
    pub fn from_settings(settings: &Settings) -> Result<Self, GatewayError> {
        let extractor: Arc<dyn Extractor> = Arc::new(HttpExtractor::new(&settings.fetch_policy)?);
        Self::with_collaborators(settings, extractor, Arc::new(Html2TextConverter))
    }

    /// Wire the given extractor and converter behind a fresh cache.
    pub fn with_collaborators(
        settings: &Settings,
        extractor: Arc<dyn Extractor>,
        converter: Arc<dyn HtmlConverter>,
    ) -> Result<Self, GatewayError> {
        let cache = Arc::new(ArticleCache::new(
            settings.cache_capacity,
            settings.cache_ttl,
        )?);
        let gateway = ExtractorGateway::new(extractor, settings.fetch_policy);
        let articles = Arc::new(ArticleService::new(cache, gateway, settings.key_policy));
        let markdown = Arc::new(MarkdownView::new(Arc::clone(&articles), converter));

        Ok(Self { articles, markdown })
    }
}
