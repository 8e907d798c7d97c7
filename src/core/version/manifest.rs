// ─── Version Pointer ───
// The update server's `versions.json`, naming the current release.

use serde::Deserialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};

/// Top-level pointer document: `{"latest": {"release": "<id>"}}`.
#[derive(Debug, Deserialize)]
pub struct VersionPointer {
    #[serde(default)]
    pub latest: LatestVersions,
}

#[derive(Debug, Default, Deserialize)]
pub struct LatestVersions {
    #[serde(default)]
    pub release: Option<String>,
}

impl VersionPointer {
    /// Fetch the pointer document using a shared HTTP client.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> LauncherResult<Self> {
        info!("Looking for 'latest' version on update server...");

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        serde_json::from_str(&raw).map_err(|e| LauncherError::parse(url, e))
    }

    /// The declared latest release, if the document names one.
    pub fn latest_release(&self) -> Option<&str> {
        self.latest
            .release
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_pointer_document() {
        let json = r#"{"latest": {"release": "1.7.10", "snapshot": "14w21b"}}"#;
        let pointer: VersionPointer = serde_json::from_str(json).unwrap();
        assert_eq!(pointer.latest_release(), Some("1.7.10"));
    }

    #[test]
    fn empty_release_is_absent() {
        let pointer: VersionPointer = serde_json::from_str(r#"{"latest": {}}"#).unwrap();
        assert_eq!(pointer.latest_release(), None);

        let pointer: VersionPointer =
            serde_json::from_str(r#"{"latest": {"release": null}}"#).unwrap();
        assert_eq!(pointer.latest_release(), None);

        let pointer: VersionPointer = serde_json::from_str("{}").unwrap();
        assert_eq!(pointer.latest_release(), None);
    }
}
