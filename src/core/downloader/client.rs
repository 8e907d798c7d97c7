use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Collaborator that refreshes cached index documents from the update server.
#[async_trait]
pub trait IndexFetcher: Send + Sync {
    /// Fetch `url` and store the body at `dest`.
    async fn fetch_to(&self, url: &str, dest: &Path) -> LauncherResult<()>;
}

/// Plain HTTP fetcher; time limits come from the shared client.
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Download a single file to `dest`.
    ///
    /// The body is fully received before `dest` is touched, so a failed or
    /// timed-out request leaves the cached copy as it was.
    pub async fn download_file(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        // Write to file inside a block to ensure the handle is dropped immediately
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| LauncherError::Io {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
            file.write_all(&bytes).await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
            file.flush().await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }
}

#[async_trait]
impl IndexFetcher for Downloader {
    async fn fetch_to(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        self.download_file(url, dest).await
    }
}
