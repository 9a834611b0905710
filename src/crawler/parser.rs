//! HTML content extraction
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Plain text for sentiment scoring
//! - Anchor hrefs in document order (resolution happens in `crate::url`)
//!
//! The underlying HTML parser is error-tolerant: malformed markup yields a
//! best-effort document rather than an error.

use scraper::{Html, Selector};

/// Title recorded for pages without a non-empty `<title>`
pub const NO_TITLE: &str = "No title";

/// Elements whose text is never part of the page content
const SKIPPED_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Elements that start a new line of text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// The page title (from the first `<title>` tag)
    pub title: Option<String>,

    /// Visible text, one line per block element
    pub text: String,

    /// Raw `href` values of `<a>` elements, in document order
    pub hrefs: Vec<String>,
}

impl ExtractedPage {
    /// The title, or [`NO_TITLE`] if the page has none
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }
}

/// Parses HTML content and extracts title, text and anchors
///
/// # Example
///
/// ```
/// use site_sentiment::crawler::extract_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello.</p><a href="/page">Link</a></body></html>"#;
/// let page = extract_page(html);
/// assert_eq!(page.title, Some("Test".to_string()));
/// assert_eq!(page.hrefs, vec!["/page".to_string()]);
/// ```
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the visible text of the document
///
/// Text nodes are concatenated in tree order; block elements start a new
/// line so that unrelated blocks do not run into one sentence. Blank lines
/// are removed and every line is trimmed.
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();

    for node in document.root_element().descendants() {
        if let Some(element) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&element.name()) {
                raw.push('\n');
            }
            continue;
        }

        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| SKIPPED_ELEMENTS.contains(&element.name()))
        });

        if !skipped {
            raw.push_str(text);
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts every anchor href in document order
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
