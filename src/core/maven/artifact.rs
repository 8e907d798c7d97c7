use std::fmt;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::Platform;

/// A `groupId:artifactId:version` coordinate as written in `libraries[].name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenArtifact {
    /// Parse a coordinate triple.
    ///
    /// ```
    /// use launcher_lib::core::maven::MavenArtifact;
    ///
    /// let a = MavenArtifact::parse("net.sf.jopt-simple:jopt-simple:5.0.4").unwrap();
    /// assert_eq!(a.group_id, "net.sf.jopt-simple");
    /// ```
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        let parts: Vec<&str> = coord.trim().split(':').collect();

        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self {
                    group_id: group.to_string(),
                    artifact_id: artifact.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(LauncherError::InvalidMavenCoordinate(coord.to_string())),
        }
    }

    /// Construct the group path portion (`net/sf/jopt-simple`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Repository path without extension:
    /// `<group_path>/<artifact_id>/<version>/<artifact_id>-<version>`.
    ///
    /// Always `/`-separated; it doubles as the key into the library index.
    pub fn base_path(&self) -> String {
        format!(
            "{}/{}/{}/{}-{}",
            self.group_path(),
            self.artifact_id,
            self.version,
            self.artifact_id,
            self.version
        )
    }

    /// Relative path of the regular archive.
    pub fn jar_path(&self) -> String {
        format!("{}.jar", self.base_path())
    }

    /// Relative path of the native archive for `platform`.
    pub fn natives_path(&self, platform: Platform) -> String {
        format!("{}{}.jar", self.base_path(), platform.native_suffix())
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_coordinate() {
        let a = MavenArtifact::parse("net.sf.jopt-simple:jopt-simple:5.0.4").unwrap();
        assert_eq!(a.group_id, "net.sf.jopt-simple");
        assert_eq!(a.artifact_id, "jopt-simple");
        assert_eq!(a.version, "5.0.4");
        assert_eq!(a.to_string(), "net.sf.jopt-simple:jopt-simple:5.0.4");
    }

    #[test]
    fn repository_path_construction() {
        let a = MavenArtifact::parse("org.example:foo:1.0").unwrap();
        assert_eq!(a.base_path(), "org/example/foo/1.0/foo-1.0");
        assert_eq!(a.jar_path(), "org/example/foo/1.0/foo-1.0.jar");
    }

    #[test]
    fn natives_path_uses_platform_name() {
        let a = MavenArtifact::parse("org.lwjgl.lwjgl:lwjgl-platform:2.9.1").unwrap();
        assert_eq!(
            a.natives_path(Platform::Windows),
            "org/lwjgl/lwjgl/lwjgl-platform/2.9.1/lwjgl-platform-2.9.1-natives-windows.jar"
        );
    }

    #[test]
    fn rejects_non_triples() {
        assert!(MavenArtifact::parse("org.example:foo").is_err());
        assert!(MavenArtifact::parse("org.example:foo:1.0:natives").is_err());
        assert!(MavenArtifact::parse("org.example::1.0").is_err());
    }
}
