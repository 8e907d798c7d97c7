use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::LauncherResult;

/// `libs.json`: repository path → expected hash.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryIndex {
    #[serde(default)]
    pub objects: BTreeMap<String, HashEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashEntry {
    #[serde(default)]
    pub hash: String,
}

impl LibraryIndex {
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        crate::core::cache::read_json(path).await
    }

    /// Expected hash for `relative`; empty when the index does not list it,
    /// which never verifies.
    pub fn expected_hash(&self, relative: &str) -> &str {
        self.objects
            .get(relative)
            .map(|entry| entry.hash.as_str())
            .unwrap_or_default()
    }
}
