// file: src/compiler/jdk.rs
// version: 1.0.0
// guid: 9ef32a9d-4f50-4165-a8ff-bda0f5e22332

//! JDK executable lookup

use crate::error::CompileDumpError;
use crate::Result;
use std::path::{Path, PathBuf};

/// The JDK used to compile shims and run the compiler
#[derive(Debug, Clone, Default)]
pub struct Jdk {
    home: Option<PathBuf>,
}

impl Jdk {
    pub fn new(home: Option<&Path>) -> Self {
        Self {
            home: home.map(Path::to_path_buf),
        }
    }

    pub fn java(&self) -> Result<PathBuf> {
        self.executable("java")
    }

    pub fn javac(&self) -> Result<PathBuf> {
        self.executable("javac")
    }

    fn executable(&self, name: &str) -> Result<PathBuf> {
        match &self.home {
            Some(home) => {
                let path = home.join("bin").join(name);
                if path.exists() {
                    Ok(path)
                } else {
                    Err(CompileDumpError::config(format!(
                        "No {} in JDK at {}",
                        name,
                        home.display()
                    )))
                }
            }
            None => which::which(name).map_err(|e| {
                CompileDumpError::config(format!("Unable to find {} on PATH: {}", name, e))
            }),
        }
    }
}
