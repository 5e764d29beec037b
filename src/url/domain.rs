use crate::{UrlError, UrlResult};
use url::Url;

/// Characters that cannot appear in a bare domain name handed out by the hub
const FORBIDDEN_DOMAIN_CHARS: &[char] = &['/', '\\', '?', '#', '@'];

/// Forms the root URL `scheme://domain/` for a domain name
///
/// A domain that already carries an `http://` or `https://` prefix is
/// accepted as-is; a trailing slash is tolerated but any other path is rejected.
///
/// # Examples
///
/// ```
/// use hubcrawl::url::root_url;
///
/// let url = root_url("https", "example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
///
/// assert!(root_url("https", "not a domain").is_err());
/// ```
pub fn root_url(scheme: &str, domain: &str) -> UrlResult<Url> {
    let trimmed = domain.trim();

    let (scheme, host) = match trimmed.split_once("://") {
        Some((given, rest)) if given == "http" || given == "https" => {
            (given, rest.trim_end_matches('/'))
        }
        Some(_) => return Err(UrlError::Parse(format!("unsupported scheme in '{}'", domain))),
        None => (scheme, trimmed),
    };

    if host.is_empty() {
        return Err(UrlError::MissingHost(domain.to_string()));
    }

    if host.chars().any(|c| c.is_whitespace() || FORBIDDEN_DOMAIN_CHARS.contains(&c)) {
        return Err(UrlError::Parse(format!("'{}' is not a bare domain", domain)));
    }

    let url = Url::parse(&format!("{}://{}/", scheme, host))
        .map_err(|e| UrlError::Parse(format!("{}: {}", domain, e)))?;

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(domain.to_string()));
    }

    Ok(url)
}
