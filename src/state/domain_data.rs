use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate result of crawling one domain
///
/// Serializes to the hub's wire format:
/// `{"DomainName", "Pages": {url: {"Text", "Images"}}, "TimeStamp"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainData {
    /// Domain name exactly as received from the hub
    #[serde(rename = "DomainName")]
    pub domain_name: String,

    /// Page content keyed by absolute page URL
    #[serde(rename = "Pages")]
    pub pages: BTreeMap<String, PageContent>,

    /// When the crawl was finalized
    #[serde(rename = "TimeStamp")]
    pub timestamp: DateTime<Utc>,
}

/// Text and images extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(rename = "Text")]
    pub text: String,

    #[serde(rename = "Images")]
    pub images: Vec<Image>,
}

/// A downloaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Content-derived identifier plus the original extension
    #[serde(rename = "Name")]
    pub name: String,

    /// Raw image bytes, base64 encoded on the wire
    #[serde(rename = "Data", with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl DomainData {
    /// Creates an empty result for a domain
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            pages: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Records the content of a page, replacing any earlier entry for the URL
    pub fn record_page(&mut self, url: impl Into<String>, content: PageContent) {
        self.pages.insert(url.into(), content);
    }

    /// Removes every page whose text is empty
    pub fn remove_blank_pages(&mut self) {
        self.pages.retain(|_, page| !page.is_blank());
    }

    /// Strips blank pages and stamps the completion time
    pub fn finalize(&mut self) {
        self.remove_blank_pages();
        self.timestamp = Utc::now();
    }

    /// Sum of text lengths (in bytes) across all pages
    ///
    /// Used for diagnostics only.
    pub fn total_size(&self) -> usize {
        self.pages.values().map(|page| page.text.len()).sum()
    }

    /// Number of pages recorded
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of images across all pages
    pub fn image_count(&self) -> usize {
        self.pages.values().map(|page| page.images.len()).sum()
    }
}

impl PageContent {
    /// Content recorded for a page that could not be fetched or parsed
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
