// file: src/config/loader.rs
// version: 1.0.0
// guid: bac1234f-54cd-4141-85f3-3962dab40249

//! Tool configuration file loading and environment variable substitution

use super::ToolConfig;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Default per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("compiledump").join("config.yaml"))
    }

    /// Load the explicit file when given, else the per-user file when it
    /// exists, else defaults
    pub fn load(&self, explicit: Option<&Path>) -> Result<ToolConfig> {
        if let Some(path) = explicit {
            info!("Loading tool configuration from: {}", path.display());
            return self.load_tool_config(path);
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                info!("Loading tool configuration from: {}", path.display());
                return self.load_tool_config(&path);
            }
        }

        debug!("No tool configuration file, using defaults");
        Ok(ToolConfig::default())
    }

    /// Load tool configuration from a YAML file
    pub fn load_tool_config<P: AsRef<Path>>(&self, path: P) -> Result<ToolConfig> {
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::error::CompileDumpError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        self.parse_tool_config(&content)
    }

    /// Parse YAML content, expanding `${VAR}` and `~` in paths
    pub fn parse_tool_config(&self, content: &str) -> Result<ToolConfig> {
        let expanded = self.expand_env_vars(content)?;
        let mut config: ToolConfig = serde_yaml::from_str(&expanded)?;

        config.repo_root = expand_tilde(&config.repo_root);
        config.java_home = config.java_home.as_deref().map(expand_tilde);

        if config.storage_url.trim().is_empty() {
            return Err(crate::error::CompileDumpError::ConfigError(
                "storage_url must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Expand environment variables in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::error::CompileDumpError::ConfigError(format!("Invalid regex pattern: {}", e))
        })?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(crate::error::CompileDumpError::ConfigError(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_var_expansion() {
        let mut loader = ConfigLoader::new();
        loader.set_env_var("R8_CHECKOUT".to_string(), "/work/r8".to_string());

        let config = loader
            .parse_tool_config("repo_root: ${R8_CHECKOUT}\n")
            .unwrap();
        assert_eq!(config.repo_root, PathBuf::from("/work/r8"));
        assert_eq!(config.storage_url, super::super::DEFAULT_STORAGE_URL);
    }

    #[test]
    fn test_missing_env_var() {
        let loader = ConfigLoader::new();
        let result = loader.parse_tool_config("repo_root: ${COMPILEDUMP_SURELY_UNSET_VAR}\n");

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing environment variables"));
    }

    #[test]
    fn test_empty_storage_url_rejected() {
        let loader = ConfigLoader::new();
        assert!(loader.parse_tool_config("storage_url: \"\"\n").is_err());
    }

    #[test]
    fn test_load_tool_config_file() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
repo_root: /opt/r8
java_home: /opt/jdk-17
storage_url: http://mirror.test/raw
"#
        )
        .unwrap();

        let loader = ConfigLoader::new();
        let config = loader.load(Some(file.path()))?;

        assert_eq!(config.repo_root, PathBuf::from("/opt/r8"));
        assert_eq!(config.java_home, Some(PathBuf::from("/opt/jdk-17")));
        assert_eq!(config.storage_url, "http://mirror.test/raw");
        Ok(())
    }

    #[test]
    fn test_unreadable_config_is_config_error() {
        let loader = ConfigLoader::new();
        let err = loader
            .load(Some(Path::new("/nonexistent/compiledump.yaml")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
