// file: src/config/sanitizer.rs
// version: 1.0.0
// guid: 277ee90b-776d-4d67-b79b-e8cd20e75e00

//! Compiler configuration (`proguard.config`) rewriting
//!
//! A dump taken from a real build references jars and report files of that
//! build. Those directives are dropped, and the minification/optimization/
//! shrinking toggles are forced when requested.

use super::Toggle;
use crate::Result;
use std::path::Path;
use tracing::info;

/// Directives that are always removed from a replayed configuration
const STRIPPED_DIRECTIVES: [&str; 3] = ["-injars", "-libraryjars", "-print"];

/// Forced states of the three shrinker toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShrinkerToggles {
    pub minify: Toggle,
    pub optimize: Toggle,
    pub shrink: Toggle,
}

impl ShrinkerToggles {
    fn pairs(&self) -> [(Toggle, &'static str); 3] {
        [
            (self.minify, "-dontobfuscate"),
            (self.optimize, "-dontoptimize"),
            (self.shrink, "-dontshrink"),
        ]
    }
}

/// Result of rewriting a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedConfig {
    pub content: String,
    pub added: Vec<&'static str>,
    pub removed: Vec<String>,
}

/// Rewrite configuration text. Disable directives for force-disabled toggles
/// are prepended; existing ones for force-enabled toggles are removed.
pub fn sanitize_config(content: &str, toggles: &ShrinkerToggles) -> SanitizedConfig {
    let mut sanitized = SanitizedConfig::default();

    for (toggle, directive) in toggles.pairs() {
        if toggle == Toggle::ForceDisable {
            sanitized.content.push_str(directive);
            sanitized.content.push('\n');
            sanitized.added.push(directive);
        }
    }

    for line in content.split_inclusive('\n') {
        if should_remove(line, toggles) {
            sanitized.removed.push(line.trim_end_matches(['\r', '\n']).to_string());
        } else {
            sanitized.content.push_str(line);
        }
    }

    sanitized
}

fn should_remove(line: &str, toggles: &ShrinkerToggles) -> bool {
    if STRIPPED_DIRECTIVES
        .iter()
        .any(|directive| line.contains(directive))
    {
        return true;
    }
    toggles
        .pairs()
        .iter()
        .any(|(toggle, directive)| *toggle == Toggle::ForceEnable && line.contains(directive))
}

/// Sanitize the file in place. The previous content is lost.
pub fn sanitize_config_file(path: &Path, toggles: &ShrinkerToggles) -> Result<SanitizedConfig> {
    let content = std::fs::read_to_string(path)?;
    let sanitized = sanitize_config(&content, toggles);

    for line in &sanitized.added {
        info!("Adding config line: {}", line);
    }
    for line in &sanitized.removed {
        info!("Removing from config line: {}", line);
    }

    std::fs::write(path, &sanitized.content)?;
    Ok(sanitized)
}
