//! State module for tracking crawl progress and results
//!
//! # Components
//!
//! - `CrawlPhase`: Tracks which phase a domain crawl is in (idle, crawling, done, etc.)
//! - `DomainData`: The per-domain result handed back to the hub
//! - `PageContent` / `Image`: Content extracted from one page

mod crawl_phase;
mod domain_data;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use domain_data::{DomainData, Image, PageContent};
