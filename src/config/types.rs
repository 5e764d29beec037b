use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a Hubcrawl worker
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub hub: HubConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-domain crawl behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum page-visit attempts per domain
    #[serde(rename = "crawl-budget", default = "default_crawl_budget")]
    pub crawl_budget: u32,

    /// Wait before every page fetch (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Maximum images kept per page
    #[serde(rename = "max-images-per-page", default = "default_max_images_per_page")]
    pub max_images_per_page: usize,

    /// Scheme used to form a domain's root URL
    #[serde(rename = "root-scheme", default = "default_root_scheme")]
    pub root_scheme: String,

    /// Timeout for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional wall-clock limit for crawling one domain (seconds)
    #[serde(rename = "domain-deadline-secs", default)]
    pub domain_deadline_secs: Option<u64>,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn domain_deadline(&self) -> Option<Duration> {
        self.domain_deadline_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            crawl_budget: default_crawl_budget(),
            politeness_delay_ms: default_politeness_delay_ms(),
            max_images_per_page: default_max_images_per_page(),
            root_scheme: default_root_scheme(),
            request_timeout_secs: default_request_timeout_secs(),
            domain_deadline_secs: None,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub header: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            header: default_user_agent(),
        }
    }
}

/// Location of the hub and the batch size requested from it
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub, e.g. `http://localhost:8869`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of domains requested per cycle
    #[serde(rename = "num-domains", default = "default_num_domains")]
    pub num_domains: u32,
}

/// Local output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory downloaded images are also written to
    #[serde(rename = "image-dir", default)]
    pub image_dir: Option<String>,
}

fn default_crawl_budget() -> u32 {
    100
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

fn default_max_images_per_page() -> usize {
    5
}

fn default_root_scheme() -> String {
    "https".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_num_domains() -> u32 {
    3
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
