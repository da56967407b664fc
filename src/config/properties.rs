// file: src/config/properties.rs
// version: 1.0.0
// guid: bd48bee2-78f7-43aa-b8a6-f3c789480a7b

//! `build.properties` parsing

use crate::Result;
use std::path::Path;
use tracing::warn;

/// Prefix marking JVM system properties recorded when the dump was written
pub const SYSTEM_PROPERTY_PREFIX: &str = "system-property-";

/// Recorded properties that would make the replay write another dump
const DENYLISTED_PROPERTY_SUFFIXES: [&str; 2] = ["dumpinputtofile", "dumpinputtodirectory"];

/// Key/value pairs from a dump's `build.properties`, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    entries: Vec<(String, String)>,
}

impl BuildProperties {
    /// Parse `key=value` lines. Blank lines are skipped; the value is
    /// everything after the first `=`. A repeated key keeps its first
    /// position and takes the last value.
    pub fn parse(content: &str) -> Self {
        let mut properties = Self::default();
        for line in content.lines() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }
            match stripped.split_once('=') {
                Some((key, value)) => properties.insert(key, value),
                None => warn!("Ignoring malformed build property line: {}", stripped),
            }
        }
        properties
    }

    /// Read and parse a properties file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// True when `key` is present with value `true` (case-insensitive)
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `-D` flags for every recorded system property, minus the dump-writing ones
    pub fn system_properties(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(SYSTEM_PROPERTY_PREFIX)?;
                if DENYLISTED_PROPERTY_SUFFIXES
                    .iter()
                    .any(|suffix| name.ends_with(suffix))
                {
                    return None;
                }
                if value.is_empty() {
                    Some(format!("-D{}", name))
                } else {
                    Some(format!("-D{}={}", name, value))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines_and_keeps_order() {
        let props = BuildProperties::parse("tool=R8\n\n  min-api=21  \nmode=release\n");

        assert_eq!(props.get("tool"), Some("R8"));
        assert_eq!(props.get("min-api"), Some("21"));
        assert_eq!(props.get("mode"), Some("release"));
        assert!(!props.contains_key("missing"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let props = BuildProperties::parse("system-property-a.b=x=y\n");
        assert_eq!(props.get("system-property-a.b"), Some("x=y"));
    }

    #[test]
    fn test_malformed_line_is_ignored() {
        let props = BuildProperties::parse("no-separator\ntool=d8\n");
        assert_eq!(props.get("tool"), Some("d8"));
        assert!(!props.contains_key("no-separator"));
    }

    #[test]
    fn test_system_properties_forwarding() {
        let props = BuildProperties::parse(
            "tool=r8\n\
             system-property-com.android.tools.r8.flag=\n\
             system-property-com.android.tools.r8.level=3\n\
             system-property-com.android.tools.r8.dumpinputtofile=/tmp/x.zip\n\
             system-property-com.android.tools.r8.dumpinputtodirectory=/tmp\n",
        );

        assert_eq!(
            props.system_properties(),
            vec![
                "-Dcom.android.tools.r8.flag".to_string(),
                "-Dcom.android.tools.r8.level=3".to_string(),
            ]
        );
    }

    #[test]
    fn test_is_true() {
        let props = BuildProperties::parse("android-platform-build=TRUE\nclassfile=false\n");
        assert!(props.is_true("android-platform-build"));
        assert!(!props.is_true("classfile"));
        assert!(!props.is_true("missing"));
    }
}
