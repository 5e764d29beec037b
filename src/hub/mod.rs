//! Hub protocol, worker side
//!
//! The hub hands out batches of domains (`GET /getCrawlJobs?num_domains=N`)
//! and accepts one JSON-encoded `DomainData` per crawled domain
//! (`POST /postCrawlData`). The hub server and its persistence live elsewhere.

mod client;
mod protocol;

pub use client::HubClient;
pub use protocol::{CrawlJobs, GET_CRAWL_JOBS, NUM_DOMAINS_PARAM, POST_CRAWL_DATA};
