//! URL handling module for Hubcrawl
//!
//! This module forms a domain's root URL and resolves the links found on a
//! page into in-scope absolute URLs.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::root_url;
pub use resolve::resolve_link;

/// Returns the last `.`-delimited segment of a URL's final path segment
///
/// Used as the file extension of downloaded images.
///
/// # Examples
///
/// ```
/// use hubcrawl::url::url_extension;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.example.com/img/photo.large.JPG").unwrap();
/// assert_eq!(url_extension(&url), Some("jpg".to_string()));
///
/// let url = Url::parse("https://cdn.example.com/img/photo").unwrap();
/// assert_eq!(url_extension(&url), None);
/// ```
pub fn url_extension(url: &::url::Url) -> Option<String> {
    let last_segment = url.path_segments()?.next_back()?;
    let (_, ext) = last_segment.rsplit_once('.')?;

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}
