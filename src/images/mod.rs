//! Image downloads
//!
//! Gallery images are downloaded sequentially into one directory under
//! deterministic names derived from the vehicle, so re-running a harvest
//! finds the files already present and skips the network.

use crate::listing::ListingRecord;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Result of a single successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The image was downloaded and written
    Downloaded { bytes: usize },

    /// A file with the target name already existed; nothing was requested
    AlreadyPresent,
}

/// Builds the file name for the `index`-th image of a vehicle
///
/// Brand and model are lowercased, each whitespace run becomes a hyphen, and anything other
/// than letters, digits, `_` and `-` is dropped. The first image carries no
/// index suffix.
///
/// # Example
///
/// ```
/// use lot_harvester::images::generate_filename;
///
/// assert_eq!(generate_filename("BMW", "X5", 2019, 0), "bmw-x5-2019.jpg");
/// assert_eq!(generate_filename("BMW", "X5", 2019, 2), "bmw-x5-2019-2.jpg");
/// ```
pub fn generate_filename(brand: &str, model: &str, year: i32, index: usize) -> String {
    let brand = clean_component(brand);
    let model = clean_component(model);

    if index > 0 {
        format!("{}-{}-{}-{}.jpg", brand, model, year, index)
    } else {
        format!("{}-{}-{}.jpg", brand, model, year)
    }
}

fn clean_component(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Downloads images into a directory
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    directory: PathBuf,
}

impl ImageFetcher {
    /// Creates a fetcher writing into `directory`
    ///
    /// # Arguments
    ///
    /// * `directory` - Target directory, created on first download
    /// * `user_agent` - Browser-like user agent image hosts accept
    /// * `timeout` - Per-image request timeout
    pub fn new(
        directory: impl Into<PathBuf>,
        user_agent: &str,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            directory: directory.into(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Downloads one image to `target`
    ///
    /// An existing file at `target` is kept and reported as
    /// [`FetchOutcome::AlreadyPresent`] without any request. No retries.
    pub async fn fetch(&self, url: &str, target: &Path) -> FetchResult<FetchOutcome> {
        if tokio::fs::try_exists(target).await.unwrap_or(false) {
            tracing::debug!("Image already present: {}", target.display());
            return Ok(FetchOutcome::AlreadyPresent);
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| FetchError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let response = self.client.get(url).send().await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        tokio::fs::write(target, &body)
            .await
            .map_err(|source| FetchError::Io {
                path: target.to_path_buf(),
                source,
            })?;

        Ok(FetchOutcome::Downloaded { bytes: body.len() })
    }

    /// Downloads every URL in order and returns the names of the files obtained
    ///
    /// The `i`-th URL is always stored under index `i`, so a failure leaves a
    /// gap in the numbering rather than shifting later images. Failures are
    /// logged and skipped.
    pub async fn fetch_many(
        &self,
        urls: &[String],
        brand: &str,
        model: &str,
        year: i32,
    ) -> Vec<String> {
        let mut names = Vec::new();

        for (index, url) in urls.iter().enumerate() {
            let name = generate_filename(brand, model, year, index);
            let target = self.directory.join(&name);

            match self.fetch(url, &target).await {
                Ok(FetchOutcome::Downloaded { bytes }) => {
                    tracing::info!(
                        "Downloaded image {}/{}: {} ({} bytes)",
                        index + 1,
                        urls.len(),
                        name,
                        bytes
                    );
                    names.push(name);
                }
                Ok(FetchOutcome::AlreadyPresent) => names.push(name),
                Err(e) => tracing::warn!("Image {}/{} skipped: {}", index + 1, urls.len(), e),
            }
        }

        names
    }

    /// Replaces a record's remote image URLs with downloaded file names
    ///
    /// # Returns
    ///
    /// The number of images the record now references.
    pub async fn attach_images(&self, record: &mut ListingRecord) -> usize {
        if record.images.is_empty() {
            return 0;
        }

        let names = self
            .fetch_many(&record.images, &record.brand, &record.model, record.year)
            .await;
        record.set_images(names);
        record.images.len()
    }

    /// Attaches images to every record in order until `shutdown` is set
    ///
    /// Records reached after an interrupt keep their remote URLs.
    ///
    /// # Returns
    ///
    /// The total number of images the records now reference locally.
    pub async fn attach_all(&self, records: &mut [ListingRecord], shutdown: &AtomicBool) -> usize {
        let count = records.len();
        let mut total = 0;

        for (index, record) in records.iter_mut().enumerate() {
            if shutdown.load(Ordering::Relaxed) {
                tracing::warn!(
                    "Interrupted, skipping images for {} remaining records",
                    count - index
                );
                break;
            }
            total += self.attach_images(record).await;
        }

        total
    }
}
