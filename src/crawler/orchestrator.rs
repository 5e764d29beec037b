//! Domain crawl orchestrator - the per-domain crawl loop
//!
//! One `DomainCrawler` owns everything a single domain crawl touches: the
//! frontier, the seen set and the in-progress `DomainData`. The loop:
//! 1. Seeds the frontier with the domain's root URL
//! 2. Pops the most recently discovered URL and spends one unit of budget
//! 3. Waits the politeness delay, then fetches and extracts the page
//! 4. Records the page (blank on failure) and pushes its in-scope links
//! 5. Stops when the frontier is empty, the budget is spent or the deadline passes
//! 6. Strips blank pages and timestamps the result

use crate::config::CrawlerConfig;
use crate::crawler::extractor::PageExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::output::ImageStore;
use crate::state::{CrawlPhase, DomainData, PageContent};
use crate::url::root_url;
use crate::CrawlError;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable in-scope page was visited
    FrontierExhausted,
    /// The page budget was spent
    BudgetExhausted,
    /// The per-domain deadline passed
    DeadlineReached,
}

/// Crawls a single domain to completion
pub struct DomainCrawler<'a, F> {
    fetcher: &'a F,
    settings: &'a CrawlerConfig,
    image_store: Option<&'a ImageStore>,
    cancel: CancellationToken,
    domain: String,
    phase: CrawlPhase,
    frontier: Frontier,
    data: DomainData,
}

impl<'a, F: Fetcher> DomainCrawler<'a, F> {
    /// Creates a crawler for `domain` in the `Idle` phase
    pub fn new(fetcher: &'a F, settings: &'a CrawlerConfig, domain: impl Into<String>) -> Self {
        let domain = domain.into();

        Self {
            fetcher,
            settings,
            image_store: None,
            cancel: CancellationToken::new(),
            data: DomainData::new(domain.clone()),
            domain,
            phase: CrawlPhase::Idle,
            frontier: Frontier::new(),
        }
    }

    pub fn with_image_store(mut self, store: Option<&'a ImageStore>) -> Self {
        self.image_store = store;
        self
    }

    /// Observes `token` before every delay and fetch
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Runs the crawl and returns the finalized result
    ///
    /// # Returns
    ///
    /// * `Ok(DomainData)` - Crawl finished; blank pages stripped
    /// * `Err(CrawlError::DomainResolution)` - The domain name cannot form a root URL
    /// * `Err(CrawlError::Cancelled)` - The cancellation token fired mid-crawl
    pub async fn run(mut self) -> Result<DomainData, CrawlError> {
        let root = match root_url(&self.settings.root_scheme, &self.domain) {
            Ok(root) => root,
            Err(e) => {
                self.transition(CrawlPhase::Failed);
                return Err(CrawlError::DomainResolution {
                    domain: self.domain.clone(),
                    reason: e.to_string(),
                });
            }
        };
        self.transition(CrawlPhase::RootResolved);
        tracing::info!("Crawling {} from {}", self.domain, root);

        self.transition(CrawlPhase::Crawling);
        let stop = match self.crawl_loop(root).await {
            Ok(stop) => stop,
            Err(e) => {
                self.transition(CrawlPhase::Failed);
                return Err(e);
            }
        };

        self.transition(CrawlPhase::Finalizing);
        let attempted = self.data.page_count();
        self.data.finalize();
        self.transition(CrawlPhase::Done);

        tracing::info!(
            "Finished {} ({:?}): {} pages kept of {} visited, {} URLs discovered, {} images, {} bytes of text",
            self.domain,
            stop,
            self.data.page_count(),
            attempted,
            self.frontier.seen_count(),
            self.data.image_count(),
            self.data.total_size()
        );

        Ok(self.data)
    }

    async fn crawl_loop(&mut self, root: Url) -> Result<StopReason, CrawlError> {
        let deadline = self.settings.domain_deadline().map(|d| Instant::now() + d);
        let delay = self.settings.politeness_delay();
        let mut budget = self.settings.crawl_budget;

        let extractor = PageExtractor::new(self.fetcher, self.settings.max_images_per_page)
            .with_image_store(self.image_store);

        self.frontier.push(root);

        loop {
            if self.frontier.is_empty() {
                return Ok(StopReason::FrontierExhausted);
            }
            if budget == 0 {
                return Ok(StopReason::BudgetExhausted);
            }
            self.check_cancelled()?;
            if deadline_passed(deadline) {
                tracing::warn!("Deadline reached for {}, stopping early", self.domain);
                return Ok(StopReason::DeadlineReached);
            }

            let Some(url) = self.frontier.pop() else {
                return Ok(StopReason::FrontierExhausted);
            };
            budget -= 1;

            self.politeness_wait(delay).await?;
            if deadline_passed(deadline) {
                tracing::warn!("Deadline reached for {}, stopping early", self.domain);
                return Ok(StopReason::DeadlineReached);
            }

            tracing::debug!(
                "Visiting {} ({} queued, {} left in budget)",
                url,
                self.frontier.len(),
                budget
            );

            let (content, links) = tokio::select! {
                _ = self.cancel.cancelled() => return Err(self.cancelled()),
                visited = visit(&extractor, self.fetcher, &url) => visited,
            };

            self.data.record_page(url.as_str(), content);

            for link in links {
                self.frontier.push(link);
            }
        }
    }

    async fn politeness_wait(&self, delay: std::time::Duration) -> Result<(), CrawlError> {
        self.check_cancelled()?;

        if delay.is_zero() {
            return Ok(());
        }

        tokio::select! {
            _ = self.cancel.cancelled() => Err(self.cancelled()),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    fn check_cancelled(&self) -> Result<(), CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        Ok(())
    }

    fn cancelled(&self) -> CrawlError {
        tracing::warn!("Crawl of {} cancelled", self.domain);
        CrawlError::Cancelled {
            domain: self.domain.clone(),
        }
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal crawl phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::trace!("{}: {} -> {}", self.domain, self.phase, next);
        self.phase = next;
    }
}

/// Fetches and extracts one page
///
/// Any failure yields blank content and no links, so the URL stays recorded
/// (and seen) without contributing text.
async fn visit<F: Fetcher>(
    extractor: &PageExtractor<'_, F>,
    fetcher: &F,
    url: &Url,
) -> (PageContent, Vec<Url>) {
    let body = match fetcher.fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", url, e);
            return (PageContent::blank(), Vec::new());
        }
    };

    match extractor.extract(&body, url).await {
        Ok(page) => (
            PageContent {
                text: page.text,
                images: page.images,
            },
            page.links,
        ),
        Err(e) => {
            tracing::warn!("Failed to extract {}: {}", url, e);
            (PageContent::blank(), Vec::new())
        }
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}
