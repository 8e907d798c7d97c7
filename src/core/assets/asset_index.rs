use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::cache::CacheLayout;
use crate::core::error::LauncherResult;
use crate::core::integrity;

/// Top-level asset index JSON structure.
#[derive(Debug, Default, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    pub objects: BTreeMap<String, AssetObject>,
}

#[derive(Debug, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl AssetIndex {
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        crate::core::cache::read_json(path).await
    }

    /// Verify every object of the index, stopping at the first bad one.
    pub async fn verify_objects(&self, layout: &CacheLayout) -> LauncherResult<()> {
        for obj in self.objects.values() {
            let path = layout.asset_object(&obj.hash);
            integrity::ensure_valid(&path, &obj.hash).await?;
        }

        info!("Verified {} asset objects", self.objects.len());
        Ok(())
    }
}
