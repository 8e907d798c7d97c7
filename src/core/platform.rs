// ─── Platform ───
// One identifier for the host OS. Rule matching, native archive names and the
// classpath separator all read from here so they cannot drift apart.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// Name used by manifests in `rules[].os.name` and in native archive names.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
            Platform::Linux => "linux",
        }
    }

    /// Separator between classpath entries.
    pub fn path_separator(self) -> &'static str {
        match self {
            Platform::Windows => ";",
            Platform::Osx | Platform::Linux => ":",
        }
    }

    /// Suffix appended to a library path for its native archive.
    pub fn native_suffix(self) -> String {
        format!("-natives-{}", self.name())
    }

    pub fn matches(self, os_name: &str) -> bool {
        self.name() == os_name
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
