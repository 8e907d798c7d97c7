use serde::{Deserialize, Serialize};

// Values the game receives for `${auth_uuid}` / `${auth_access_token}` offline.
const OFFLINE_UUID: &str = "HARD";
const OFFLINE_ACCESS_TOKEN: &str = "CORE";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountMode {
    Offline,
    Online,
}

/// Result of the (external) authentication exchange, or a locally
/// synthesized stand-in for offline play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub mode: AccountMode,
    pub uuid: String,
    pub access_token: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::offline()
    }
}

impl Session {
    pub fn offline() -> Self {
        Self {
            mode: AccountMode::Offline,
            uuid: OFFLINE_UUID.into(),
            access_token: OFFLINE_ACCESS_TOKEN.into(),
        }
    }

    /// Session handed over by the authenticator after a successful login.
    pub fn online(uuid: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            mode: AccountMode::Online,
            uuid: uuid.into(),
            access_token: access_token.into(),
        }
        .sanitized()
    }

    pub fn is_online(&self) -> bool {
        self.mode == AccountMode::Online
    }

    fn sanitized(mut self) -> Self {
        self.uuid = self.uuid.trim().to_string();
        self.access_token = self.access_token.trim().to_string();
        if self.uuid.is_empty() {
            self.uuid = OFFLINE_UUID.into();
        }
        if self.access_token.is_empty() {
            self.access_token = OFFLINE_ACCESS_TOKEN.into();
        }
        self
    }
}
