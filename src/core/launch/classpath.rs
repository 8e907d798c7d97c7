// ─── Classpath Builder ───
// Verifies every library the manifest declares and turns them into the
// classpath string plus the list of native archives to unpack.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::cache::CacheLayout;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::integrity;
use crate::core::maven::MavenArtifact;
use crate::core::platform::Platform;
use crate::core::version::{LibraryIndex, VersionJson};

/// Verified classpath and the native archives that go into the natives dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathPlan {
    pub classpath: String,
    pub native_archives: Vec<PathBuf>,
}

/// Build the classpath for `version`.
///
/// Libraries are processed in declaration order and the main archive is
/// appended last. The first file that fails verification aborts the build.
pub async fn build_classpath(
    manifest: &VersionJson,
    index: &LibraryIndex,
    layout: &CacheLayout,
    version: &str,
    platform: Platform,
) -> LauncherResult<ClasspathPlan> {
    let mut entries: Vec<String> = Vec::new();
    let mut native_archives = Vec::new();

    for lib in &manifest.libraries {
        let artifact = MavenArtifact::parse(&lib.name)?;

        if !lib.is_allowed_on(platform) {
            debug!("Skipping lib: {}", artifact.jar_path());
            continue;
        }

        let relative = if lib.is_native() {
            artifact.natives_path(platform)
        } else {
            artifact.jar_path()
        };
        let path = layout.library_file(&relative);
        integrity::ensure_valid(&path, index.expected_hash(&relative)).await?;

        if lib.is_native() {
            native_archives.push(path);
        } else {
            entries.push(safe_path_str(&path));
        }
    }

    let main_jar = layout.version_jar(version);
    integrity::ensure_valid(&main_jar, manifest.jar_hash()).await?;
    entries.push(safe_path_str(&main_jar));

    info!(
        "Classpath ready: {} entries, {} native archives",
        entries.len(),
        native_archives.len()
    );

    Ok(ClasspathPlan {
        classpath: entries.join(platform.path_separator()),
        native_archives,
    })
}

/// Empty and recreate the natives directory for a new launch attempt.
pub async fn prepare_natives_dir(natives_dir: &Path) -> LauncherResult<()> {
    if natives_dir.exists() {
        tokio::fs::remove_dir_all(natives_dir)
            .await
            .map_err(|e| LauncherError::Io {
                path: natives_dir.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::create_dir_all(natives_dir)
        .await
        .map_err(|e| LauncherError::Io {
            path: natives_dir.to_path_buf(),
            source: e,
        })
}

/// Unpack every native archive into `natives_dir`.
pub async fn extract_natives(archives: &[PathBuf], natives_dir: &Path) -> LauncherResult<()> {
    for archive in archives {
        let jar_bytes = tokio::fs::read(archive)
            .await
            .map_err(|e| LauncherError::Io {
                path: archive.clone(),
                source: e,
            })?;

        let dest_dir = natives_dir.to_path_buf();
        let extracted = tokio::task::spawn_blocking(move || unpack_archive(jar_bytes, &dest_dir))
            .await
            .map_err(|e| LauncherError::Io {
                path: archive.clone(),
                source: std::io::Error::other(e),
            })??;

        debug!("Extracted {} files from {:?}", extracted, archive);
    }

    Ok(())
}

fn unpack_archive(jar_bytes: Vec<u8>, dest_dir: &Path) -> LauncherResult<usize> {
    let cursor = std::io::Cursor::new(jar_bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut extracted = 0;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || file.name().starts_with("META-INF") {
            continue;
        }

        let Some(relative) = file.enclosed_name() else {
            warn!("Skipping unsafe archive entry: {}", file.name());
            continue;
        };

        let dest = dest_dir.join(relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LauncherError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut out = std::fs::File::create(&dest).map_err(|e| LauncherError::Io {
            path: dest.clone(),
            source: e,
        })?;
        std::io::copy(&mut file, &mut out).map_err(|e| LauncherError::Io {
            path: dest.clone(),
            source: e,
        })?;
        extracted += 1;
    }

    Ok(extracted)
}

/// Path as a launch-argument string.
pub fn safe_path_str(path: &Path) -> String {
    let text = path.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // Java classpath handling can fail for Windows extended-length paths
        // (e.g. `\\?\C:\...`). Strip the prefix before building launch arguments.
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}
