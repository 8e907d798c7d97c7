use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire launcher backend.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── Documents ───────────────────────────────────────
    #[error("Cannot parse {path:?} at line {line}, column {column}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Required field `{field}` is missing in {path:?}")]
    MissingField { field: &'static str, path: PathBuf },

    #[error("Index file is not cached: {0:?}")]
    MissingIndex(PathBuf),

    // ── Integrity ───────────────────────────────────────
    #[error("File {path:?} is missing")]
    FileMissing { path: PathBuf },

    #[error("File {path:?} cannot be read: {source}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid library coordinate: {0}")]
    InvalidMavenCoordinate(String),

    // ── Versions ────────────────────────────────────────
    #[error("Cannot resolve version alias: {0}")]
    AliasResolution(String),

    // ── Launch ──────────────────────────────────────────
    #[error("A launch is already in progress")]
    LaunchInProgress,

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    /// Whether the failure means the local cache is stale or damaged and the
    /// user has to run the updater before launching again.
    pub fn requires_update(&self) -> bool {
        matches!(
            self,
            LauncherError::MissingIndex(_)
                | LauncherError::FileMissing { .. }
                | LauncherError::FileUnreadable { .. }
                | LauncherError::Sha1Mismatch { .. }
        )
    }

    /// Wrap a `serde_json` failure with the document path and its position.
    pub fn parse(path: impl Into<PathBuf>, err: serde_json::Error) -> Self {
        LauncherError::Parse {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
