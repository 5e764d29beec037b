//! Crawler module for per-domain crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` seam
//! - HTML scanning for text, links and images
//! - The LIFO frontier with its seen set
//! - The per-domain crawl loop and the multi-domain session

mod extractor;
mod fetcher;
mod frontier;
mod orchestrator;
mod session;


pub use extractor::{normalize_text, parse_document, scan_document, ExtractedPage, PageExtractor, PageScan};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use orchestrator::{DomainCrawler, StopReason};
pub use session::{CrawlSession, SubmitOutcome};
