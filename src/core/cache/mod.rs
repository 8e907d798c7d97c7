// ─── Local Cache ───
// On-disk layout of the launcher data directory and JSON document loading.
//
//   versions/<id>/<id>.json   version manifest
//   versions/<id>/<id>.jar    main program archive
//   versions/<id>/libs.json   library index
//   versions/<id>/files.json  custom-file index
//   libraries/                library and native archives
//   assets/indexes/           asset indexes
//   assets/objects/<hh>/      asset objects
//   natives/                  extracted natives, recreated per launch
//   prefix/<id>/              per-version game directory
//   config/                   trust store
//   logs/                     launcher logs

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::core::error::{LauncherError, LauncherResult};

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.versions_dir().join(version)
    }

    pub fn version_manifest(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(format!("{}.json", version))
    }

    pub fn version_jar(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(format!("{}.jar", version))
    }

    pub fn library_index(&self, version: &str) -> PathBuf {
        self.version_dir(version).join("libs.json")
    }

    pub fn custom_files_index(&self, version: &str) -> PathBuf {
        self.version_dir(version).join("files.json")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// Resolve a `/`-separated repository path under `libraries/`.
    pub fn library_file(&self, relative: &str) -> PathBuf {
        join_relative(&self.libraries_dir(), relative)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_index(&self, name: &str) -> PathBuf {
        self.assets_dir()
            .join("indexes")
            .join(format!("{}.json", name))
    }

    /// `assets/objects/<first two hash chars>/<hash>`.
    pub fn asset_object(&self, hash: &str) -> PathBuf {
        let prefix = hash.get(..2).unwrap_or(hash);
        self.assets_dir().join("objects").join(prefix).join(hash)
    }

    pub fn natives_dir(&self) -> PathBuf {
        self.root.join("natives")
    }

    /// Working directory of a version; custom files live under it.
    pub fn game_dir(&self, version: &str) -> PathBuf {
        self.root.join("prefix").join(version)
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn trust_store(&self) -> PathBuf {
        self.config_dir().join("keystore.ks")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

/// Join a `/`-separated relative path onto `base` component by component.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(base.to_path_buf(), |path, part| path.join(part))
}

/// Read and parse a cached JSON document.
///
/// A missing file is reported as [`LauncherError::MissingIndex`]; malformed
/// content as [`LauncherError::Parse`] with its position.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> LauncherResult<T> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LauncherError::MissingIndex(path.to_path_buf()));
        }
        Err(source) => {
            return Err(LauncherError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&raw).map_err(|e| LauncherError::parse(path, e))
}
