use crate::hub::protocol::{CrawlJobs, GET_CRAWL_JOBS, NUM_DOMAINS_PARAM, POST_CRAWL_DATA};
use crate::state::DomainData;
use crate::CrawlError;
use reqwest::Client;
use url::Url;

/// HTTP client for the hub's job and submission endpoints
#[derive(Debug, Clone)]
pub struct HubClient {
    client: Client,
    jobs_url: Url,
    submit_url: Url,
}

impl HubClient {
    /// Creates a client for the hub at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use hubcrawl::hub::HubClient;
    ///
    /// let hub = HubClient::new("http://localhost:8869", reqwest::Client::new()).unwrap();
    /// assert_eq!(hub.submit_url().as_str(), "http://localhost:8869/postCrawlData");
    /// ```
    pub fn new(base_url: &str, client: Client) -> Result<Self, CrawlError> {
        let base = base_url.trim_end_matches('/');

        Ok(Self {
            client,
            jobs_url: endpoint(base, GET_CRAWL_JOBS)?,
            submit_url: endpoint(base, POST_CRAWL_DATA)?,
        })
    }

    pub fn jobs_url(&self) -> &Url {
        &self.jobs_url
    }

    pub fn submit_url(&self) -> &Url {
        &self.submit_url
    }

    /// Requests up to `num_domains` domains to crawl
    ///
    /// Any failure (transport, status, body) is logged and treated as
    /// "no jobs available".
    pub async fn request_jobs(&self, num_domains: u32) -> Vec<String> {
        let mut url = self.jobs_url.clone();
        url.query_pairs_mut()
            .append_pair(NUM_DOMAINS_PARAM, &num_domains.to_string());

        tracing::debug!("Requesting crawl jobs from {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to reach hub at {}: {}", url, e);
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Hub returned {} for {}", status, url);
            return Vec::new();
        }

        match response.json::<CrawlJobs>().await {
            Ok(jobs) => {
                let domains = jobs.into_domains();
                tracing::info!("Received {} domains from hub", domains.len());
                domains
            }
            Err(e) => {
                tracing::warn!("Malformed crawl jobs response from {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// Posts one finalized domain result to the hub
    pub async fn post_crawl_data(&self, data: &DomainData) -> Result<(), CrawlError> {
        let submission_error = |reason: String| CrawlError::Submission {
            domain: data.domain_name.clone(),
            reason,
        };

        let response = self
            .client
            .post(self.submit_url.clone())
            .json(data)
            .send()
            .await
            .map_err(|e| submission_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(submission_error(format!("hub returned {}: {}", status, body.trim())));
        }

        tracing::info!(
            "Submitted {} ({} pages, {} bytes of text)",
            data.domain_name,
            data.page_count(),
            data.total_size()
        );
        Ok(())
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, CrawlError> {
    Url::parse(&format!("{}{}", base, path))
        .map_err(|e| crate::UrlError::Parse(format!("{}{}: {}", base, path, e)).into())
}
