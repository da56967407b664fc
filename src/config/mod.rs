// file: src/config/mod.rs
// version: 1.0.0
// guid: 30dfd731-ffa5-4330-9c03-16db5e6356a6

//! Tool configuration and dump option resolution

pub mod loader;
pub mod properties;
pub mod resolve;
pub mod sanitizer;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use properties::BuildProperties;
pub use resolve::{CompilerVariant, ResolvedInvocation, Toggle};
pub use sanitizer::{SanitizedConfig, ShrinkerToggles};

/// Default location of released and per-commit compiler builds
pub const DEFAULT_STORAGE_URL: &str = "https://storage.googleapis.com/r8-releases/raw";

/// Where the tool finds its collaborators: the compiler checkout, the JDK
/// and the artifact store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Root of a compiler source checkout, used by the `main` and `source`
    /// versions, the javac shims and the retrace tool
    pub repo_root: PathBuf,
    /// JDK to run java/javac from; `PATH` is searched when unset
    pub java_home: Option<PathBuf>,
    /// Base URL of the artifact store
    pub storage_url: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            java_home: None,
            storage_url: DEFAULT_STORAGE_URL.to_string(),
        }
    }
}

impl ToolConfig {
    /// In-tree non-library build
    pub fn r8_jar(&self) -> PathBuf {
        self.repo_root.join("build").join("libs").join("r8.jar")
    }

    /// In-tree library (obfuscated) build
    pub fn r8lib_jar(&self) -> PathBuf {
        self.repo_root.join("build").join("libs").join("r8lib.jar")
    }

    /// Mapping file produced alongside [`Self::r8lib_jar`]
    pub fn r8lib_map(&self) -> PathBuf {
        self.repo_root.join("build").join("libs").join("r8lib.jar.map")
    }

    pub fn build_java_main_dir(&self) -> PathBuf {
        self.repo_root
            .join("build")
            .join("classes")
            .join("java")
            .join("main")
    }

    pub fn all_deps_jar(&self) -> PathBuf {
        self.repo_root.join("build").join("libs").join("deps_all.jar")
    }

    /// Source file of a dump shim class, e.g. `CompileDumpD8`
    pub fn shim_source(&self, class_name: &str) -> PathBuf {
        self.repo_root
            .join("src/main/java/com/android/tools/r8/utils")
            .join(format!("{}.java", class_name))
    }

    /// Apply command line overrides on top of this configuration
    pub fn with_overrides(
        mut self,
        repo_root: Option<&Path>,
        java_home: Option<&Path>,
        storage_url: Option<&str>,
    ) -> Self {
        if let Some(root) = repo_root {
            self.repo_root = root.to_path_buf();
        }
        if let Some(home) = java_home {
            self.java_home = Some(home.to_path_buf());
        }
        if let Some(url) = storage_url {
            self.storage_url = url.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_relative_to_repo_root() {
        let config = ToolConfig {
            repo_root: PathBuf::from("/src/r8"),
            ..ToolConfig::default()
        };

        assert_eq!(config.r8_jar(), PathBuf::from("/src/r8/build/libs/r8.jar"));
        assert_eq!(
            config.r8lib_map(),
            PathBuf::from("/src/r8/build/libs/r8lib.jar.map")
        );
        assert_eq!(
            config.shim_source("CompileDumpD8"),
            PathBuf::from("/src/r8/src/main/java/com/android/tools/r8/utils/CompileDumpD8.java")
        );
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = ToolConfig::default().with_overrides(
            Some(Path::new("/checkout")),
            None,
            Some("http://mirror.test/raw"),
        );

        assert_eq!(config.repo_root, PathBuf::from("/checkout"));
        assert_eq!(config.java_home, None);
        assert_eq!(config.storage_url, "http://mirror.test/raw");
    }
}
