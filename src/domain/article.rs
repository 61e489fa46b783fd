use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical extraction result for one URL string.
///
/// Serialized as the flat JSON object returned by `/parse` and `/parse/md`.
/// Values are produced whole by an extractor and never mutated afterwards;
/// derived views are built with [`ParsedArticle::with_content`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ParsedArticle {
    pub title: String,
    pub author: Option<String>,
    pub date_published: Option<DateTime<Utc>>,
    pub dek: Option<String>,
    pub lead_image_url: Option<String>,
    /// HTML fragment in the canonical entry, Markdown in the derived view.
    pub content: String,
    pub next_page_url: Option<String>,
    pub url: String,
    pub domain: String,
    pub excerpt: String,
    pub word_count: usize,
    pub direction: TextDirection,
    pub total_pages: u32,
    pub rendered_pages: u32,
}

impl ParsedArticle {
    /// Copy of this article with `content` replaced; every other field passes through.
    #[must_use]
    pub fn with_content(&self, content: String) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Parse an HTML `dir` attribute value. Anything other than `rtl` reads as `ltr`.
    #[must_use]
    pub fn from_dir_attr(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("rtl") {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }
}
