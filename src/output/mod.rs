//! Output module for crawl artifacts and reports
//!
//! This module handles:
//! - Content-addressed naming of downloaded images
//! - Optional on-disk copies of images
//! - Recording and printing crawl statistics

mod images;
pub mod stats;

pub use images::{image_name, ImageStore};
pub use stats::{print_statistics, CrawlStatistics};
