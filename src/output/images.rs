//! Image naming and local image persistence
//!
//! Images are named after the SHA-256 of their bytes, so two downloads of
//! the same payload always share a name and distinct payloads never collide.

use crate::state::Image;
use crate::url::url_extension;
use crate::CrawlError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Extension used when the source URL does not carry one
const FALLBACK_EXTENSION: &str = "bin";

/// Builds a content-addressed image name: `<sha256 hex>.<ext>`
///
/// # Examples
///
/// ```
/// use hubcrawl::output::image_name;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.example.com/logo.png").unwrap();
/// let name = image_name(b"abc", &url);
/// assert!(name.ends_with(".png"));
/// assert_eq!(name.len(), 64 + ".png".len());
/// ```
pub fn image_name(data: &[u8], source: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());

    let extension = url_extension(source).unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    format!("{}.{}", digest, extension)
}

/// Writes downloaded images into a local directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an image to `<dir>/<name>`, creating the directory if needed
    ///
    /// Returns the path written.
    pub async fn save(&self, image: &Image) -> Result<PathBuf, CrawlError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(&image.name);
        tokio::fs::write(&path, &image.data).await?;

        tracing::debug!("Image saved to {}", path.display());
        Ok(path)
    }
}
