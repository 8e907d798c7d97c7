// ─── Integrity Verifier ───
// Compares on-disk content against the SHA-1 declared by an index.

use std::path::Path;

use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Hash sentinel for files the user is expected to modify.
pub const MUTABLE_HASH: &str = "mutable";

const READ_CHUNK: usize = 64 * 1024;

/// Outcome of inspecting one file.
#[derive(Debug)]
pub enum FileStatus {
    Valid,
    Missing,
    Unreadable(std::io::Error),
    Mismatch { actual: String },
}

impl FileStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FileStatus::Valid)
    }
}

/// `true` when `path` exists and either is exempt (`mutable`) or its SHA-1
/// equals `expected` (hex, case-insensitive).
pub async fn verify(path: &Path, expected: &str) -> bool {
    inspect(path, expected).await.is_valid()
}

/// Like [`verify`] but returns an error describing the failure.
pub async fn ensure_valid(path: &Path, expected: &str) -> LauncherResult<()> {
    match inspect(path, expected).await {
        FileStatus::Valid => Ok(()),
        FileStatus::Missing => Err(LauncherError::FileMissing {
            path: path.to_path_buf(),
        }),
        FileStatus::Unreadable(source) => Err(LauncherError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }),
        FileStatus::Mismatch { actual } => Err(LauncherError::Sha1Mismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        }),
    }
}

/// Inspect a file without modifying it.
pub async fn inspect(path: &Path, expected: &str) -> FileStatus {
    debug!("Precheck: {:?}", path);

    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return FileStatus::Missing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return FileStatus::Missing,
        Err(e) => return FileStatus::Unreadable(e),
    }

    if expected == MUTABLE_HASH {
        return FileStatus::Valid;
    }

    let actual = match sha1_file(path).await {
        Ok(hash) => hash,
        Err(e) => {
            debug!("Precheck: can't read {:?}: {}", path, e);
            return FileStatus::Unreadable(e);
        }
    };

    if actual.eq_ignore_ascii_case(expected) {
        FileStatus::Valid
    } else {
        debug!("Precheck: bad checksum for {:?}", path);
        FileStatus::Mismatch { actual }
    }
}

/// SHA-1 over the whole file, hex encoded in lowercase.
pub async fn sha1_file(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; READ_CHUNK];

    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
