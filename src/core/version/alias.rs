// ─── Alias Resolution ───
// Turns the symbolic `latest` request into a concrete version id.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use super::manifest::VersionPointer;
use super::version_file::VersionJson;
use crate::core::cache::CacheLayout;
use crate::core::error::{LauncherError, LauncherResult};

/// Symbolic version id meaning "newest release".
pub const LATEST_ALIAS: &str = "latest";

/// One strategy for picking the version `latest` stands for.
#[async_trait]
pub trait AliasResolver: Send + Sync {
    async fn resolve_latest(&self) -> LauncherResult<String>;
}

/// Resolve `requested` through `resolver` when it is the `latest` alias.
pub async fn resolve_version(
    requested: &str,
    resolver: &dyn AliasResolver,
) -> LauncherResult<String> {
    if requested != LATEST_ALIAS {
        return Ok(requested.to_string());
    }

    let version = resolver.resolve_latest().await?;
    info!("Game version is {}", version);
    Ok(version)
}

// ─── Online ───

/// Reads the release id declared by the update server's pointer document.
pub struct OnlineAliasResolver {
    client: reqwest::Client,
    pointer_url: String,
}

impl OnlineAliasResolver {
    pub fn new(client: reqwest::Client, pointer_url: impl Into<String>) -> Self {
        Self {
            client,
            pointer_url: pointer_url.into(),
        }
    }
}

#[async_trait]
impl AliasResolver for OnlineAliasResolver {
    async fn resolve_latest(&self) -> LauncherResult<String> {
        let pointer = VersionPointer::fetch(&self.client, &self.pointer_url).await?;
        pointer
            .latest_release()
            .map(ToString::to_string)
            .ok_or_else(|| LauncherError::AliasResolution("empty game version".into()))
    }
}

// ─── Offline ───

/// Picks the cached version with the newest `releaseTime`.
pub struct OfflineAliasResolver {
    layout: CacheLayout,
}

impl OfflineAliasResolver {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    async fn cached_version_ids(&self) -> LauncherResult<Vec<String>> {
        let versions_dir = self.layout.versions_dir();
        let mut ids = Vec::new();

        let mut entries = match tokio::fs::read_dir(&versions_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(source) => {
                return Err(LauncherError::Io {
                    path: versions_dir,
                    source,
                })
            }
        };

        while let Some(entry) = entries.next_entry().await.map_err(|source| LauncherError::Io {
            path: versions_dir.clone(),
            source,
        })? {
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }

        Ok(ids)
    }

    async fn release_time(&self, version: &str) -> Option<DateTime<FixedOffset>> {
        let path = self.layout.version_manifest(version);
        match VersionJson::load(&path).await {
            Ok(manifest) => manifest.release_timestamp(),
            Err(LauncherError::MissingIndex(_)) => None,
            Err(e) => {
                warn!("Skipping cached version {}: {}", version, e);
                None
            }
        }
    }
}

#[async_trait]
impl AliasResolver for OfflineAliasResolver {
    async fn resolve_latest(&self) -> LauncherResult<String> {
        info!("Looking for 'latest' local version");

        let mut candidates = Vec::new();
        for version in self.cached_version_ids().await? {
            if let Some(released) = self.release_time(&version).await {
                debug!("Cached version {} released {}", version, released);
                candidates.push((version, released));
            }
        }

        newest_unique(candidates)
            .ok_or_else(|| LauncherError::AliasResolution("no installed version found".into()))
    }
}

/// The id with the strictly greatest timestamp; `None` when there are no
/// candidates or the greatest timestamp is shared.
fn newest_unique(candidates: Vec<(String, DateTime<FixedOffset>)>) -> Option<String> {
    let newest = candidates.iter().map(|(_, released)| *released).max()?;
    let mut at_newest = candidates
        .into_iter()
        .filter(|(_, released)| *released == newest);

    let (version, _) = at_newest.next()?;
    if at_newest.next().is_some() {
        warn!("Several cached versions share release time {}", newest);
        return None;
    }

    Some(version)
}
