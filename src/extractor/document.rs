//! Article extraction from a fetched HTML document.
//!
//! Metadata comes from `<meta>`/`<link>` tags, the body from the first
//! substantial candidate among semantic and commonly used content containers.

use chrono::{DateTime, NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::ExtractorFailure;
use crate::domain::{ParsedArticle, TextDirection};

/// Candidates are tried in order; the first with enough text wins.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".story-body",
    ".article__body",
    ".content-body",
    "#article-body",
    "#content",
];

/// Minimum characters of text for a candidate to count as the article body.
const MIN_CONTENT_CHARS: usize = 140;
const EXCERPT_CHARS: usize = 200;

const STRIPPED_ELEMENTS: &str = "script, style, noscript, template, iframe";

/// Extract an article from `html`, fetched from `final_url`.
///
/// # Errors
/// Returns [`ExtractorFailure::Failed`] when no candidate carries enough text.
pub fn extract_article(html: &str, final_url: &Url) -> Result<ParsedArticle, ExtractorFailure> {
    let document = Html::parse_document(html);

    let (content_html, text) = extract_content(&document)
        .ok_or_else(|| ExtractorFailure::Failed("no article content found".to_string()))?;

    let url = link_href(&document, "link[rel='canonical']", final_url)
        .or_else(|| meta_url(&document, &["og:url"], final_url))
        .unwrap_or_else(|| final_url.to_string());
    let domain = Url::parse(&url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .or_else(|| final_url.host_str().map(str::to_string))
        .unwrap_or_default();

    let title = meta_content(&document, &["og:title", "twitter:title"])
        .or_else(|| first_text(&document, "title"))
        .or_else(|| first_text(&document, "h1"))
        .unwrap_or_default();

    let excerpt = meta_content(&document, &["description", "og:description"])
        .unwrap_or_else(|| truncate_chars(&text, EXCERPT_CHARS));

    Ok(ParsedArticle {
        title,
        author: meta_content(&document, &["author", "article:author", "byl"]),
        date_published: meta_content(
            &document,
            &["article:published_time", "datePublished", "pubdate", "date"],
        )
        .and_then(|raw| parse_date(&raw)),
        dek: meta_content(&document, &["dek", "subtitle"]),
        lead_image_url: meta_url(&document, &["og:image", "twitter:image"], final_url),
        content: content_html,
        next_page_url: link_href(&document, "link[rel='next']", final_url),
        url,
        domain,
        excerpt,
        word_count: text.split_whitespace().count(),
        direction: direction(&document),
        total_pages: 1,
        rendered_pages: 1,
    })
}

/// Inner HTML and normalized text of the first substantial content candidate,
/// falling back to `<body>`.
fn extract_content(document: &Html) -> Option<(String, String)> {
    let candidates = CONTENT_SELECTORS
        .iter()
        .chain(std::iter::once(&"body"))
        .filter_map(|s| Selector::parse(s).ok());

    for selector in candidates {
        for element in document.select(&selector) {
            let text = visible_text(element);
            if text.chars().count() >= MIN_CONTENT_CHARS {
                return Some((clean_inner_html(element), text));
            }
        }
    }
    None
}

/// Text content with whitespace collapsed, skipping script-like elements.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    collect_text(element, &mut words);
    words.join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, words: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            words.extend(text.split_whitespace());
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !is_stripped(child_element.value().name()) {
                collect_text(child_element, words);
            }
        }
    }
}

fn is_stripped(name: &str) -> bool {
    STRIPPED_ELEMENTS.split(", ").any(|stripped| stripped == name)
}

/// Inner HTML with stripped elements removed. `scraper` documents are
/// immutable, so the fragment is re-parsed and the offending nodes detached.
fn clean_inner_html(element: ElementRef<'_>) -> String {
    let mut fragment = Html::parse_fragment(&element.inner_html());
    let Ok(stripped) = Selector::parse(STRIPPED_ELEMENTS) else {
        return element.inner_html().trim().to_string();
    };
    let ids: Vec<_> = fragment.select(&stripped).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }
    fragment.root_element().inner_html().trim().to_string()
}

/// First non-empty `content` of `<meta>` tags matching any of `names` via
/// `name`, `property`, or `itemprop`.
fn meta_content(document: &Html, names: &[&str]) -> Option<String> {
    let selector = Selector::parse("meta").ok()?;
    names.iter().find_map(|wanted| {
        document.select(&selector).find_map(|meta| {
            let el = meta.value();
            let matches = ["name", "property", "itemprop"]
                .iter()
                .filter_map(|attr| el.attr(attr))
                .any(|value| value.eq_ignore_ascii_case(wanted));
            if !matches {
                return None;
            }
            el.attr("content")
                .map(str::trim)
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
    })
}

fn meta_url(document: &Html, names: &[&str], base: &Url) -> Option<String> {
    meta_content(document, names).and_then(|raw| resolve(base, &raw))
}

fn link_href(document: &Html, selector: &str, base: &Url) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .find_map(|link| link.value().attr("href"))
        .and_then(|href| resolve(base, href.trim()))
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(|u| u.to_string())
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(visible_text)
        .find(|text| !text.is_empty())
}

fn direction(document: &Html) -> TextDirection {
    ["html", "body"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("dir"))
                .map(TextDirection::from_dir_attr)
        })
        .unwrap_or_default()
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (read as midnight UTC).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    match cut.rfind(' ') {
        Some(space) => format!("{}...", &cut[..space]),
        None => format!("{cut}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <!DOCTYPE html>
        <html dir="ltr">
        <head>
            <title>Fallback Title</title>
            <meta property="og:title" content="Rust Gateways in Practice">
            <meta name="author" content="Ada Lovelace">
            <meta property="article:published_time" content="2024-03-05T10:30:00+09:00">
            <meta name="description" content="How a cache fronts an extractor.">
            <meta property="og:image" content="/images/lead.png">
            <link rel="canonical" href="https://news.example.com/posts/42">
            <link rel="next" href="/posts/42?page=2">
        </head>
        <body>
            <nav>Home | About | Contact</nav>
            <article>
                <h1>Rust Gateways in Practice</h1>
                <p>A pull-through cache consults its store first and only reaches the upstream
                extractor on a miss, writing the result back for the next reader.</p>
                <script>trackReader();</script>
                <p>Entries expire after a fixed time-to-live and the least recently used entry
                is evicted when the store is full.</p>
            </article>
            <footer>Copyright</footer>
        </body>
        </html>
    "#;

    fn base() -> Url {
        Url::parse("https://news.example.com/posts/42?utm=feed").unwrap()
    }

    #[test]
    fn extracts_metadata_and_content() {
        let article = extract_article(ARTICLE_PAGE, &base()).unwrap();

        assert_eq!(article.title, "Rust Gateways in Practice");
        assert_eq!(article.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(
            article.date_published.unwrap().to_rfc3339(),
            "2024-03-05T01:30:00+00:00"
        );
        assert_eq!(article.excerpt, "How a cache fronts an extractor.");
        assert_eq!(
            article.lead_image_url.as_deref(),
            Some("https://news.example.com/images/lead.png")
        );
        assert_eq!(article.url, "https://news.example.com/posts/42");
        assert_eq!(
            article.next_page_url.as_deref(),
            Some("https://news.example.com/posts/42?page=2")
        );
        assert_eq!(article.domain, "news.example.com");
        assert_eq!(article.direction, TextDirection::Ltr);
        assert_eq!(article.dek, None);
        assert_eq!((article.total_pages, article.rendered_pages), (1, 1));

        assert!(article.content.contains("<p>A pull-through cache"));
        assert!(!article.content.contains("trackReader"));
        assert!(!article.content.contains("Home | About"));
        assert!(article.word_count > 30);
    }

    #[test]
    fn falls_back_to_title_tag_final_url_and_text_excerpt() {
        let html = format!(
            "<html dir='rtl'><head><title> Plain Page </title></head><body><div>{}</div></body></html>",
            "word ".repeat(80)
        );
        let article = extract_article(&html, &base()).unwrap();

        assert_eq!(article.title, "Plain Page");
        assert_eq!(article.url, base().to_string());
        assert_eq!(article.direction, TextDirection::Rtl);
        assert!(article.excerpt.ends_with("..."));
        assert!(article.excerpt.chars().count() <= EXCERPT_CHARS + 3);
        assert_eq!(article.author, None);
        assert_eq!(article.word_count, 80);
    }

    #[test]
    fn page_without_text_is_not_an_article() {
        let html = "<html><head><title>Empty</title></head><body><img src='a.png'></body></html>";
        let error = extract_article(html, &base()).unwrap_err();
        assert!(matches!(error, ExtractorFailure::Failed(_)));
    }

    #[test]
    fn parses_rfc3339_and_bare_dates() {
        assert!(parse_date("2024-01-02T03:04:05Z").is_some());
        assert_eq!(
            parse_date("2024-01-02").unwrap().to_rfc3339(),
            "2024-01-02T00:00:00+00:00"
        );
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn truncates_on_word_boundary() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("alpha beta gamma", 12), "alpha beta...");
    }
}
