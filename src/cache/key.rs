use std::str::FromStr;

use url::Url;

/// How a request URL string becomes a cache key.
///
/// `Literal` keeps the exact request string, so textually different spellings of
/// one page are cached separately. `Normalized` folds the common spellings
/// (scheme/host case, fragment, query order, trailing slash) into one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    #[default]
    Literal,
    Normalized,
}

impl KeyPolicy {
    #[must_use]
    pub fn cache_key(self, url: &str) -> String {
        match self {
            Self::Literal => url.to_string(),
            Self::Normalized => normalize_url(url).unwrap_or_else(|| url.to_string()),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "normalized" => Ok(Self::Normalized),
            other => Err(format!(
                "unknown cache key policy '{other}' (expected 'literal' or 'normalized')"
            )),
        }
    }
}

/// `None` when the string does not parse as an absolute URL.
fn normalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        pairs.sort();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(if trimmed.is_empty() { "/" } else { &trimmed });
    }

    Some(url.to_string())
}
