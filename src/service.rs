//! Cache-first article retrieval with pull-through on miss.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheStore, FlightRole, InFlight, KeyPolicy};
use crate::domain::ParsedArticle;
use crate::extractor::{ExtractorGateway, FetchError};

pub type ArticleCache = CacheStore<String, Arc<ParsedArticle>>;

type FetchOutcome = Result<Arc<ParsedArticle>, FetchError>;

pub struct ArticleService {
    cache: Arc<ArticleCache>,
    gateway: Arc<ExtractorGateway>,
    key_policy: KeyPolicy,
    in_flight: InFlight<FetchOutcome>,
}

impl ArticleService {
    pub fn new(cache: Arc<ArticleCache>, gateway: ExtractorGateway, key_policy: KeyPolicy) -> Self {
        Self {
            cache,
            gateway: Arc::new(gateway),
            key_policy,
            in_flight: InFlight::new(),
        }
    }

    pub fn cache(&self) -> &Arc<ArticleCache> {
        &self.cache
    }

    pub fn key_policy(&self) -> KeyPolicy {
        self.key_policy
    }

    /// Return the article for `url`.
    ///
    /// With `ignore_cache = false` a fresh cache entry is returned as-is; on a
    /// miss the gateway is called once per key (concurrent misses share the
    /// call) and a success is written back. With `ignore_cache = true` the
    /// cache is neither read nor written.
    ///
    /// # Errors
    /// Gateway failures are returned unchanged and never cached.
    pub async fn get_article(&self, url: &str, ignore_cache: bool) -> FetchOutcome {
        if ignore_cache {
            debug!(url, "Cache bypassed");
            return self.gateway.fetch(url).await.map(Arc::new);
        }

        let key = self.key_policy.cache_key(url);
        if let Some(article) = self.cache.get(&key) {
            debug!(url, "Cache hit");
            return Ok(article);
        }

        let cache = Arc::clone(&self.cache);
        let gateway = Arc::clone(&self.gateway);
        let fetch_url = url.to_string();
        let write_key = key.clone();

        let (role, joined) = self
            .in_flight
            .run(
                &key,
                || self.cache.get(&key).map(Ok),
                move || async move {
                    let article = Arc::new(gateway.fetch(&fetch_url).await?);
                    cache.set(write_key, Arc::clone(&article));
                    info!(url = %fetch_url, entries = cache.len(), "Cached extracted article");
                    Ok::<_, FetchError>(article)
                },
            )
            .await;

        match role {
            FlightRole::Leader => debug!(url, "Cache miss, fetched upstream"),
            FlightRole::Follower => debug!(url, "Cache miss, joined in-flight fetch"),
        }

        joined.unwrap_or_else(|join_error| {
            warn!(url, error = %join_error, "Extraction task aborted");
            Err(FetchError::Extraction {
                url: url.to_string(),
                reason: "extraction task aborted".to_string(),
            })
        })
    }
}
