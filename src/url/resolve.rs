use url::Url;

/// Substrings that mark an href as non-content noise
const NOISE_SUBSTRINGS: &[&str] = &["wp-content"];

/// Suffixes that mark an href as a non-page resource
const NOISE_SUFFIXES: &[&str] = &[".css", ".torrent"];

/// Resolves an href against the page it was found on and applies the crawl scope
///
/// Returns None if the link should be excluded:
/// - The href carries a query string (`?`) or fragment (`#`)
/// - The href contains `wp-content` or ends in `.css` / `.torrent`
/// - The href cannot be resolved against `base`
/// - The resolved URL is not HTTP(S)
/// - The resolved URL's host differs from `base`'s host
///
/// Same-host links are rewritten onto `base`'s scheme, so `http://` and
/// `https://` spellings of one page share a single frontier entry.
///
/// # Examples
///
/// ```
/// use hubcrawl::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let link = resolve_link(&base, "intro").unwrap();
/// assert_eq!(link.as_str(), "https://example.com/docs/intro");
///
/// assert!(resolve_link(&base, "https://other.com/").is_none());
/// assert!(resolve_link(&base, "/search?q=rust").is_none());
/// ```
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.contains('?') || href.contains('#') {
        return None;
    }

    if is_noise(href) {
        return None;
    }

    let mut resolved = base.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if resolved.host_str() != base.host_str() {
        return None;
    }

    if resolved.scheme() != base.scheme() {
        resolved.set_scheme(base.scheme()).ok()?;
    }

    Some(resolved)
}

fn is_noise(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();

    NOISE_SUBSTRINGS.iter().any(|s| lower.contains(s))
        || NOISE_SUFFIXES.iter().any(|s| lower.ends_with(s))
}
