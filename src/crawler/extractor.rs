//! Page extraction: text, in-scope links and images
//!
//! Extraction runs in two steps. `scan_document` walks the parsed tree once,
//! in document order, and collects:
//! - Text of every text node outside `<script>` and `<style>`
//! - In-scope links from `<a href>` (see `resolve_link`)
//! - Image sources from `<img src>`
//!
//! `PageExtractor` then downloads images through the `Fetcher` until the
//! per-page limit is reached.

use crate::crawler::fetcher::Fetcher;
use crate::output::{image_name, ImageStore};
use crate::state::Image;
use crate::url::resolve_link;
use crate::CrawlError;
use scraper::{Html, Node};
use std::collections::HashSet;
use url::Url;

/// Elements whose text content is never page text
const CODE_ELEMENTS: &[&str] = &["script", "style"];

const IFRAME_OPEN: &str = "<iframe";
const IFRAME_CLOSE: &str = "</iframe>";

/// Everything found on a page before any image is downloaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageScan {
    /// Accumulated page text, fragments joined by a single space
    pub text: String,

    /// In-scope links, deduplicated, in document order
    pub links: Vec<Url>,

    /// Absolute image URLs, in document order
    pub image_sources: Vec<Url>,
}

/// Result of extracting one page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub text: String,
    pub links: Vec<Url>,
    pub images: Vec<Image>,
}

/// Parses a fetched body into an HTML document
///
/// Bodies that are not valid UTF-8 are rejected, so binary resources reached
/// through anchors never contribute text.
pub fn parse_document(body: &[u8], page_url: &Url) -> Result<Html, CrawlError> {
    let html = std::str::from_utf8(body).map_err(|e| CrawlError::Parse {
        url: page_url.to_string(),
        message: e.to_string(),
    })?;

    Ok(Html::parse_document(html))
}

/// Walks a document and collects its text, links and image sources
///
/// # Example
///
/// ```
/// use hubcrawl::crawler::{parse_document, scan_document};
/// use url::Url;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let html = br#"<html><body><p>Hello</p><a href="/next">Next</a></body></html>"#;
/// let document = parse_document(html, &page).unwrap();
/// let scan = scan_document(&document, &page);
///
/// assert_eq!(scan.text, "Hello Next");
/// assert_eq!(scan.links[0].as_str(), "https://example.com/next");
/// ```
pub fn scan_document(document: &Html, page_url: &Url) -> PageScan {
    let mut scan = PageScan::default();
    let mut seen_links = HashSet::new();

    // (node, inside script/style)
    let mut stack = vec![(document.tree.root(), false)];

    while let Some((node, in_code)) = stack.pop() {
        let mut children_in_code = in_code;

        match node.value() {
            Node::Text(text) if !in_code => append_text(&mut scan.text, text),
            Node::Element(element) => {
                let name = element.name();

                if CODE_ELEMENTS.contains(&name) {
                    children_in_code = true;
                }

                match name {
                    "a" => {
                        if let Some(link) = element.attr("href").and_then(|h| resolve_link(page_url, h)) {
                            if seen_links.insert(link.clone()) {
                                scan.links.push(link);
                            }
                        }
                    }
                    "img" => {
                        if let Some(source) = element.attr("src").and_then(|s| resolve_image(page_url, s)) {
                            scan.image_sources.push(source);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }

        // Reverse so the first child is popped first
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, children_in_code));
        }
    }

    scan
}

/// Normalizes one text node
///
/// Newlines, carriage returns and tabs are dropped, literal
/// `<iframe>...</iframe>` spans are removed, then leading whitespace is trimmed.
pub fn normalize_text(raw: &str) -> String {
    let flattened: String = raw
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect();

    strip_iframes(&flattened).trim_start().to_string()
}

fn append_text(accumulator: &mut String, raw: &str) {
    let fragment = normalize_text(raw);
    if fragment.is_empty() {
        return;
    }

    if !accumulator.is_empty() {
        accumulator.push(' ');
    }
    accumulator.push_str(&fragment);
}

/// Removes `<iframe ...>...</iframe>` spans, case-insensitively
///
/// An unterminated span is removed up to the end of the text.
fn strip_iframes(text: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lower = text.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(start) = lower[cursor..].find(IFRAME_OPEN).map(|i| cursor + i) {
        result.push_str(&text[cursor..start]);

        match lower[start..].find(IFRAME_CLOSE) {
            Some(end) => cursor = start + end + IFRAME_CLOSE.len(),
            None => return result,
        }
    }

    result.push_str(&text[cursor..]);
    result
}

fn resolve_image(page_url: &Url, src: &str) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    let resolved = page_url.join(src).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Downloads the images of a page and assembles the extracted content
pub struct PageExtractor<'a, F> {
    fetcher: &'a F,
    max_images: usize,
    image_store: Option<&'a ImageStore>,
}

impl<'a, F: Fetcher> PageExtractor<'a, F> {
    pub fn new(fetcher: &'a F, max_images: usize) -> Self {
        Self {
            fetcher,
            max_images,
            image_store: None,
        }
    }

    /// Also writes every downloaded image into `store`
    pub fn with_image_store(mut self, store: Option<&'a ImageStore>) -> Self {
        self.image_store = store;
        self
    }

    /// Parses a page body and extracts its text, links and images
    ///
    /// Fails only if the body cannot be parsed; image failures are logged
    /// and skipped.
    pub async fn extract(&self, body: &[u8], page_url: &Url) -> Result<ExtractedPage, CrawlError> {
        let scan = {
            let document = parse_document(body, page_url)?;
            scan_document(&document, page_url)
        };

        let images = self.collect_images(&scan.image_sources).await;

        Ok(ExtractedPage {
            text: scan.text,
            links: scan.links,
            images,
        })
    }

    /// Fetches images in order until `max_images` have been downloaded
    pub async fn collect_images(&self, sources: &[Url]) -> Vec<Image> {
        let mut images = Vec::new();

        for source in sources {
            if images.len() >= self.max_images {
                tracing::debug!(
                    "Image limit of {} reached, skipping remaining images",
                    self.max_images
                );
                break;
            }

            let data = match self.fetcher.fetch(source).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Skipping image {}: {}", source, e);
                    continue;
                }
            };

            let image = Image {
                name: image_name(&data, source),
                data,
            };

            if let Some(store) = self.image_store {
                if let Err(e) = store.save(&image).await {
                    tracing::warn!("Failed to save image {}: {}", image.name, e);
                }
            }

            images.push(image);
        }

        images
    }
}
