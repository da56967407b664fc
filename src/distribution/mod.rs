// file: src/distribution/mod.rs
// version: 1.0.0
// guid: 31f46dd4-46fb-446d-aeee-77aecc6a46a8

//! Compiler distribution selection and acquisition

pub mod storage;

use crate::config::ToolConfig;
use crate::error::CompileDumpError;
use crate::network::NetworkDownloader;
use crate::Result;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

pub use storage::ArtifactStore;

/// Length of a full commit hash in hex digits
const HASH_LENGTH: usize = 40;

/// The forms a compiler version can be given in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    /// The in-tree build output
    Main,
    /// Class files compiled from the local checkout
    Source,
    /// A commit on main, by full hash
    Hash(String),
    /// A released version such as `8.2.47`
    Release(String),
}

impl VersionToken {
    pub fn parse(token: &str) -> Self {
        match token {
            "main" => VersionToken::Main,
            "source" => VersionToken::Source,
            hash if is_hash(hash) => VersionToken::Hash(hash.to_string()),
            release => VersionToken::Release(release.to_string()),
        }
    }

    /// Whether resolving this version needs the artifact store
    pub fn is_remote(&self) -> bool {
        matches!(self, VersionToken::Hash(_) | VersionToken::Release(_))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Main => f.write_str("main"),
            VersionToken::Source => f.write_str("source"),
            VersionToken::Hash(value) | VersionToken::Release(value) => f.write_str(value),
        }
    }
}

/// Exactly 40 hexadecimal characters
pub fn is_hash(token: &str) -> bool {
    token.len() == HASH_LENGTH && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// A runnable compiler: a single jar, or class directories plus dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    Jar(PathBuf),
    Classpath(Vec<PathBuf>),
}

impl Distribution {
    pub fn entries(&self) -> Vec<&Path> {
        match self {
            Distribution::Jar(jar) => vec![jar.as_path()],
            Distribution::Classpath(entries) => entries.iter().map(PathBuf::as_path).collect(),
        }
    }

    /// Classpath string with `first` in front of the distribution entries
    pub fn classpath_with(&self, first: Option<&Path>) -> Result<OsString> {
        let entries = first.into_iter().chain(self.entries());
        std::env::join_paths(entries)
            .map_err(|e| CompileDumpError::distribution(format!("Invalid classpath entry: {}", e)))
    }

    /// A single jar must exist; multi-entry classpaths are taken as given
    pub fn verify(&self) -> Result<()> {
        match self {
            Distribution::Jar(jar) if !jar.exists() => Err(CompileDumpError::distribution(
                format!("Distribution does not exist: {}", jar.display()),
            )),
            _ => Ok(()),
        }
    }
}

/// Locate the distribution for `version`, downloading remote builds into
/// `work_dir`
pub async fn acquire_distribution(
    version: &VersionToken,
    nolib: bool,
    work_dir: &Path,
    tools: &ToolConfig,
    downloader: &NetworkDownloader,
) -> Result<Distribution> {
    let distribution = match version {
        VersionToken::Main => Distribution::Jar(if nolib {
            tools.r8_jar()
        } else {
            tools.r8lib_jar()
        }),
        VersionToken::Source => {
            Distribution::Classpath(vec![tools.build_java_main_dir(), tools.all_deps_jar()])
        }
        VersionToken::Hash(_) | VersionToken::Release(_) => {
            let store = ArtifactStore::new(&tools.storage_url);
            let name = ArtifactStore::distribution_name(nolib);
            let url = store.artifact_url(version, name).ok_or_else(|| {
                CompileDumpError::distribution(format!("No remote artifact for {}", version))
            })?;
            let dest = work_dir.join(storage::R8_JAR);
            downloader.download(&url, &dest).await.map_err(|e| {
                CompileDumpError::distribution(format!(
                    "Unable to fetch {} for version {}: {}",
                    name, version, e
                ))
            })?;
            Distribution::Jar(dest)
        }
    };

    info!("Using distribution: {:?}", distribution);
    Ok(distribution)
}
