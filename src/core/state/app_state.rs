use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::cache::CacheLayout;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

const APP_DIR_NAME: &str = "ttyhlauncher";
const SETTINGS_FILE: &str = "launcher_settings.json";

/// User-facing launcher configuration, persisted as JSON in the data dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    pub player_name: String,
    /// Client (modpack) name on the update server.
    pub client: String,
    /// Version to launch, or `latest`.
    pub version: String,
    pub update_server: String,
    /// Interpreter to run; `java` from `PATH` when unset.
    pub java_path: Option<PathBuf>,
    /// Extra interpreter flags, whitespace separated.
    pub java_args: Option<String>,
    pub trust_store_password: String,
    pub request_timeout_secs: u64,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            player_name: "Player".into(),
            client: "default".into(),
            version: "latest".into(),
            update_server: "http://store.ttyh.ru".into(),
            java_path: None,
            java_args: None,
            trust_store_password: "123456".into(),
            request_timeout_secs: 30,
        }
    }
}

impl LauncherSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    fn server_base(&self) -> &str {
        self.update_server.trim_end_matches('/')
    }

    /// `versions.json` naming the latest release of the client.
    pub fn pointer_url(&self) -> String {
        format!("{}/{}/versions/versions.json", self.server_base(), self.client)
    }

    /// A file next to the version manifest on the server.
    pub fn version_file_url(&self, version: &str, file: &str) -> String {
        format!("{}/{}/{}/{}", self.server_base(), self.client, version, file)
    }

    pub fn asset_index_url(&self, name: &str) -> String {
        format!("{}/assets/indexes/{}.json", self.server_base(), name)
    }

    pub fn interpreter(&self) -> PathBuf {
        self.java_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("java"))
    }
}

pub struct AppState {
    pub data_dir: PathBuf,
    pub layout: CacheLayout,
    pub http_client: Client,
    pub launcher_settings: LauncherSettings,
}

impl AppState {
    /// Open the data directory (default location when `data_dir` is `None`)
    /// and load its settings.
    pub fn new(data_dir: Option<PathBuf>) -> LauncherResult<Self> {
        let data_dir = Self::resolve_data_dir(data_dir);
        std::fs::create_dir_all(&data_dir).map_err(|source| LauncherError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let launcher_settings = load_settings_from_disk(&data_dir).unwrap_or_default();
        let http_client = build_http_client(launcher_settings.request_timeout())?;

        Ok(Self {
            layout: CacheLayout::new(&data_dir),
            data_dir,
            http_client,
            launcher_settings,
        })
    }

    /// The override when given, otherwise `<platform data dir>/ttyhlauncher`.
    pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
        data_dir.unwrap_or_else(default_data_dir)
    }

    pub fn save_settings(&self) -> LauncherResult<()> {
        let settings_path = self.data_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(&self.launcher_settings)?;
        std::fs::write(&settings_path, json).map_err(|source| LauncherError::Io {
            path: settings_path,
            source,
        })
    }
}

fn load_settings_from_disk(data_dir: &Path) -> Option<LauncherSettings> {
    let path = data_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring unreadable settings {:?}: {}", path, e);
            None
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
