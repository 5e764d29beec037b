//! HTTP fetcher implementation
//!
//! This module handles all page and image downloads for the crawler:
//! - The `Fetcher` trait the crawl loop is written against
//! - Building HTTP clients with a browser-like user agent
//! - GET requests that follow redirects and reject non-2xx statuses

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Retrieves the raw bytes behind a URL
///
/// Implementations must follow redirects, treat any non-2xx final status as
/// an error, and release the response before returning.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, CrawlError>> + Send;
}

/// Fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the crawler and user agent configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, crawler.request_timeout())?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, CrawlError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })?;

        tracing::trace!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Total timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use hubcrawl::config::UserAgentConfig;
/// use hubcrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header.as_str())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}
