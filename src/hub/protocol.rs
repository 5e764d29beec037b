use serde::{Deserialize, Serialize};

/// Endpoint that hands out domains to crawl
pub const GET_CRAWL_JOBS: &str = "/getCrawlJobs";

/// Endpoint that accepts one crawled domain
pub const POST_CRAWL_DATA: &str = "/postCrawlData";

/// Query parameter carrying the requested batch size
pub const NUM_DOMAINS_PARAM: &str = "num_domains";

/// Response body of `GET /getCrawlJobs`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlJobs {
    /// `null` when the hub has nothing to hand out
    #[serde(default)]
    pub domains: Option<Vec<String>>,
}

impl CrawlJobs {
    pub fn into_domains(self) -> Vec<String> {
        self.domains.unwrap_or_default()
    }
}
