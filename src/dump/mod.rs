// file: src/dump/mod.rs
// version: 1.0.0
// guid: d8b17019-3de0-47b4-8912-dc0c7e58459a

//! Dump layout and artifact accessors
//!
//! A dump is a directory holding a fixed set of optional files. Every
//! accessor returns `None` when the file is absent.

pub mod reader;
pub mod summary;

use crate::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

pub use reader::read_dump;
pub use summary::{summarize_dump_files, summarize_jar};

pub const PROGRAM_JAR: &str = "program.jar";
pub const LIBRARY_JAR: &str = "library.jar";
pub const CLASSPATH_JAR: &str = "classpath.jar";
pub const DESUGARED_LIBRARY_JSON: &str = "desugared-library.json";
pub const MAIN_DEX_RULES: &str = "main-dex-rules.txt";
pub const BUILD_PROPERTIES: &str = "build.properties";
pub const CONFIG_FILE: &str = "proguard.config";
pub const VERSION_FILE: &str = "r8-version";

/// Artifacts that can appear in a dump but cannot be replayed
pub const UNSUPPORTED_ARTIFACTS: [(&str, &str); 2] = [
    ("proguard_input.config", "proguard input map"),
    ("main-dex-list.txt", "main-dex list"),
];

/// Name of the n-th feature archive, counting from 1
pub fn feature_jar_name(index: usize) -> String {
    format!("feature-{}.jar", index)
}

/// A dump directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    directory: PathBuf,
}

impl Dump {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn if_exists(&self, name: &str) -> Option<PathBuf> {
        let path = self.directory.join(name);
        path.exists().then_some(path)
    }

    pub fn program_jar(&self) -> Option<PathBuf> {
        self.if_exists(PROGRAM_JAR)
    }

    /// Feature archives in index order; discovery stops at the first gap
    pub fn feature_jars(&self) -> Vec<PathBuf> {
        (1..)
            .map(|index| self.if_exists(&feature_jar_name(index)))
            .take_while(Option::is_some)
            .flatten()
            .collect()
    }

    pub fn library_jar(&self) -> Option<PathBuf> {
        self.if_exists(LIBRARY_JAR)
    }

    pub fn classpath_jar(&self) -> Option<PathBuf> {
        self.if_exists(CLASSPATH_JAR)
    }

    pub fn desugared_library_json(&self) -> Option<PathBuf> {
        self.if_exists(DESUGARED_LIBRARY_JSON)
    }

    pub fn main_dex_rules(&self) -> Option<PathBuf> {
        self.if_exists(MAIN_DEX_RULES)
    }

    pub fn build_properties_file(&self) -> Option<PathBuf> {
        self.if_exists(BUILD_PROPERTIES)
    }

    pub fn config_file(&self) -> Option<PathBuf> {
        self.if_exists(CONFIG_FILE)
    }

    pub fn version_file(&self) -> Option<PathBuf> {
        self.if_exists(VERSION_FILE)
    }

    /// First whitespace-delimited token of the version marker
    pub fn version(&self) -> Result<Option<String>> {
        let Some(file) = self.version_file() else {
            return Ok(None);
        };
        let content = std::fs::read_to_string(file)?;
        Ok(content.split_whitespace().next().map(str::to_string))
    }

    /// Present artifacts that the replay does not wire into the command
    pub fn unsupported_artifacts(&self) -> Vec<&'static str> {
        UNSUPPORTED_ARTIFACTS
            .iter()
            .filter(|(name, _)| self.if_exists(name).is_some())
            .map(|(_, description)| *description)
            .collect()
    }

    /// Log a warning for every artifact in [`Self::unsupported_artifacts`]
    pub fn warn_unsupported_artifacts(&self) {
        for description in self.unsupported_artifacts() {
            warn!(
                "Unsupported artifact present, {} is not passed to the compiler",
                description
            );
        }
    }
}
