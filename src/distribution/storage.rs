// file: src/distribution/storage.rs
// version: 1.0.0
// guid: f99562c6-9074-4f91-a821-88ffc17bf65b

//! Artifact store layout

use super::VersionToken;

/// Non-library build artifact
pub const R8_JAR: &str = "r8.jar";
/// Library (obfuscated) build artifact
pub const R8LIB_JAR: &str = "r8lib.jar";
/// Mapping for [`R8LIB_JAR`]
pub const R8LIB_MAP: &str = "r8lib.jar.map";

/// Remote store of released and per-commit builds.
///
/// Releases live under `<base>/<version>/`, commits built from main under
/// `<base>/main/<hash>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    base_url: String,
}

impl ArtifactStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of `name` for a remote version; local versions have none
    pub fn artifact_url(&self, version: &VersionToken, name: &str) -> Option<String> {
        match version {
            VersionToken::Hash(hash) => Some(format!("{}/main/{}/{}", self.base_url, hash, name)),
            VersionToken::Release(release) => {
                Some(format!("{}/{}/{}", self.base_url, release, name))
            }
            VersionToken::Main | VersionToken::Source => None,
        }
    }

    /// Distribution artifact name for the library/non-library choice
    pub fn distribution_name(nolib: bool) -> &'static str {
        if nolib {
            R8_JAR
        } else {
            R8LIB_JAR
        }
    }
}
