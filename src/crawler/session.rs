//! Crawl session - the worker's queues of pending and completed domains
//!
//! A session holds the domains received from the hub and the results waiting
//! to be submitted. Domains are crawled strictly one after another; a failure
//! in one domain never stops the others.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::orchestrator::DomainCrawler;
use crate::hub::HubClient;
use crate::output::{CrawlStatistics, ImageStore};
use crate::state::DomainData;
use crate::CrawlError;
use tokio_util::sync::CancellationToken;

/// Result of draining the completed queue toward the hub
#[derive(Debug, Default)]
pub struct SubmitOutcome {
    /// Domains the hub accepted, in submission order
    pub delivered: Vec<String>,

    /// One error per rejected domain; those results stay queued
    pub errors: Vec<CrawlError>,
}

impl SubmitOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Queues of domains to crawl and crawled results to submit
pub struct CrawlSession<F> {
    fetcher: F,
    settings: CrawlerConfig,
    image_store: Option<ImageStore>,
    cancel: CancellationToken,

    /// Domains waiting to be crawled; the last one is crawled next
    domains_to_crawl: Vec<String>,

    /// Finalized results; the last one is submitted next
    domains_crawled: Vec<DomainData>,
}

impl<F: Fetcher> CrawlSession<F> {
    pub fn new(fetcher: F, settings: CrawlerConfig) -> Self {
        Self {
            fetcher,
            settings,
            image_store: None,
            cancel: CancellationToken::new(),
            domains_to_crawl: Vec::new(),
            domains_crawled: Vec::new(),
        }
    }

    pub fn with_image_store(mut self, store: Option<ImageStore>) -> Self {
        self.image_store = store;
        self
    }

    /// Shares `token` with every domain crawl started by this session
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Queues a domain for crawling
    pub fn insert_domain(&mut self, domain: impl Into<String>) {
        self.domains_to_crawl.push(domain.into());
    }

    pub fn insert_domains<I, S>(&mut self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for domain in domains {
            self.insert_domain(domain);
        }
    }

    /// Asks the hub for up to `num_domains` domains and queues them
    ///
    /// Returns the number of domains received; zero means no jobs this cycle.
    pub async fn request_jobs(&mut self, hub: &HubClient, num_domains: u32) -> usize {
        let domains = hub.request_jobs(num_domains).await;
        let received = domains.len();
        self.insert_domains(domains);
        received
    }

    /// Domains still waiting to be crawled
    pub fn pending_domains(&self) -> &[String] {
        &self.domains_to_crawl
    }

    /// Results waiting to be submitted
    pub fn completed(&self) -> &[DomainData] {
        &self.domains_crawled
    }

    /// Crawls the next queued domain
    ///
    /// # Returns
    ///
    /// * `None` - Nothing left to crawl
    /// * `Some(Ok(()))` - The domain finished and its result was queued for submission
    /// * `Some(Err(_))` - The domain was dropped
    pub async fn crawl_next_domain(&mut self) -> Option<Result<(), CrawlError>> {
        let domain = self.domains_to_crawl.pop()?;

        let crawler = DomainCrawler::new(&self.fetcher, &self.settings, domain)
            .with_image_store(self.image_store.as_ref())
            .with_cancellation(self.cancel.clone());
        tracing::debug!(
            "Starting {} ({} domains still queued)",
            crawler.domain(),
            self.domains_to_crawl.len()
        );

        match crawler.run().await {
            Ok(data) => {
                self.domains_crawled.push(data);
                Some(Ok(()))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Crawls every queued domain
    ///
    /// Per-domain failures are logged and counted. Cancellation stops the
    /// session, leaving the remaining domains queued.
    pub async fn crawl_all(&mut self) -> CrawlStatistics {
        let mut stats = CrawlStatistics::default();

        while let Some(domain) = self.domains_to_crawl.last().cloned() {
            match self.crawl_next_domain().await {
                Some(Ok(())) => {
                    if let Some(data) = self.domains_crawled.last() {
                        stats.record_completed(data);
                    }
                }
                Some(Err(CrawlError::Cancelled { .. })) => {
                    tracing::warn!("Session cancelled while crawling {}", domain);
                    // Crawl it again next time
                    self.domains_to_crawl.push(domain);
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!("Dropping domain {}: {}", domain, e);
                    stats.record_failed(&domain);
                }
                None => break,
            }
        }

        stats
    }

    /// Submits the most recently completed result to the hub
    ///
    /// On failure the result is put back so a later call can retry it.
    pub async fn submit_next(&mut self, hub: &HubClient) -> Option<Result<String, CrawlError>> {
        let data = self.domains_crawled.pop()?;

        match hub.post_crawl_data(&data).await {
            Ok(()) => Some(Ok(data.domain_name)),
            Err(e) => {
                tracing::error!("Submission of {} failed: {}", data.domain_name, e);
                self.domains_crawled.push(data);
                Some(Err(e))
            }
        }
    }

    /// Submits every completed result
    ///
    /// A rejected result is set aside and the remaining results are still
    /// attempted. Rejected results go back onto the queue in their original
    /// order so a later call can retry them.
    pub async fn submit_all(&mut self, hub: &HubClient) -> SubmitOutcome {
        let mut outcome = SubmitOutcome::default();
        let mut rejected = Vec::new();

        while let Some(data) = self.domains_crawled.pop() {
            match hub.post_crawl_data(&data).await {
                Ok(()) => outcome.delivered.push(data.domain_name),
                Err(e) => {
                    tracing::error!("Submission of {} failed: {}", data.domain_name, e);
                    rejected.push(data);
                    outcome.errors.push(e);
                }
            }
        }

        rejected.reverse();
        self.domains_crawled = rejected;

        outcome
    }

    /// Sum of text lengths across all pages of a result
    pub fn total_size(data: &DomainData) -> usize {
        data.total_size()
    }
}
