//! Per-session crawl statistics
//!
//! Collected while domains finish and printed once a crawl cycle ends.

use crate::state::DomainData;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Domains that produced a result
    pub domains_completed: usize,

    /// Domains that were dropped, in the order they failed
    pub domains_failed: Vec<String>,

    /// Pages kept across completed domains
    pub pages: usize,

    /// Images attached across completed domains
    pub images: usize,

    /// Sum of page text lengths across completed domains
    pub total_text_bytes: usize,
}

impl CrawlStatistics {
    pub fn record_completed(&mut self, data: &DomainData) {
        self.domains_completed += 1;
        self.pages += data.page_count();
        self.images += data.image_count();
        self.total_text_bytes += data.total_size();
    }

    pub fn record_failed(&mut self, domain: &str) {
        self.domains_failed.push(domain.to_string());
    }

    pub fn domains_attempted(&self) -> usize {
        self.domains_completed + self.domains_failed.len()
    }

    /// Folds another cycle's statistics into this one
    pub fn merge(&mut self, other: CrawlStatistics) {
        self.domains_completed += other.domains_completed;
        self.domains_failed.extend(other.domains_failed);
        self.pages += other.pages;
        self.images += other.images;
        self.total_text_bytes += other.total_text_bytes;
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Domains attempted: {}", stats.domains_attempted());
    println!("  Domains completed: {}", stats.domains_completed);
    println!("  Pages kept: {}", stats.pages);
    println!("  Images attached: {}", stats.images);
    println!("  Text collected: {} bytes", stats.total_text_bytes);
    println!();

    if !stats.domains_failed.is_empty() {
        println!("Failed Domains ({}):", stats.domains_failed.len());
        for domain in &stats.domains_failed {
            println!("  - {}", domain);
        }
        println!();
    }

    let success_rate = if stats.domains_attempted() > 0 {
        (stats.domains_completed as f64 / stats.domains_attempted() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} domains crawled)",
        success_rate,
        stats.domains_completed,
        stats.domains_attempted()
    );
}
