use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use super::library_index::HashEntry;
use crate::core::error::LauncherResult;
use crate::core::integrity::MUTABLE_HASH;

/// `files.json`: client-specific files shipped on top of the vanilla game.
#[derive(Debug, Default, Deserialize)]
pub struct CustomFileIndex {
    #[serde(default)]
    pub objects: BTreeMap<String, HashEntry>,
    /// Paths the user is allowed to change; only their presence is checked.
    #[serde(default)]
    pub mutable: BTreeSet<String>,
}

impl CustomFileIndex {
    pub async fn load(path: &Path) -> LauncherResult<Self> {
        crate::core::cache::read_json(path).await
    }

    /// Every listed file with the hash it must be verified against.
    pub fn expectations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.objects.iter().map(|(path, entry)| {
            let hash = if self.mutable.contains(path) {
                MUTABLE_HASH
            } else {
                entry.hash.as_str()
            };
            (path.as_str(), hash)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutable_paths_are_exempt_from_hashing() {
        let index: CustomFileIndex = serde_json::from_str(
            r#"{
                "objects": {
                    "mods/core.jar": {"hash": "1111"},
                    "config/options.cfg": {"hash": "2222"}
                },
                "mutable": ["config/options.cfg"]
            }"#,
        )
        .unwrap();

        let expectations: Vec<_> = index.expectations().collect();
        assert_eq!(
            expectations,
            vec![("config/options.cfg", "mutable"), ("mods/core.jar", "1111")]
        );
    }
}
