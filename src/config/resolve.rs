// file: src/config/resolve.rs
// version: 1.0.0
// guid: e4f830e6-7f5c-42b4-a565-996c5a8a7bcc

//! Option resolution: command line first, then `build.properties`, then absent

use super::BuildProperties;
use crate::error::CompileDumpError;
use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// The four compilers a dump can be replayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerVariant {
    D8,
    /// R8 in Proguard compatibility mode
    R8,
    /// R8 in full mode
    R8Full,
    L8,
}

impl CompilerVariant {
    pub const ALL: [CompilerVariant; 4] = [Self::D8, Self::R8, Self::R8Full, Self::L8];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerVariant::D8 => "d8",
            CompilerVariant::R8 => "r8",
            CompilerVariant::R8Full => "r8full",
            CompilerVariant::L8 => "l8",
        }
    }

    /// Class whose `main` runs this compiler
    pub fn entry_point(&self) -> &'static str {
        match self {
            CompilerVariant::D8 => "com.android.tools.r8.utils.CompileDumpD8",
            CompilerVariant::L8 => "com.android.tools.r8.L8",
            CompilerVariant::R8 | CompilerVariant::R8Full => {
                "com.android.tools.r8.utils.CompileDumpCompatR8"
            }
        }
    }

    pub fn requires_compat_flag(&self) -> bool {
        matches!(self, CompilerVariant::R8)
    }

    /// d8 does not shrink and takes no `--pg-conf`
    pub fn accepts_config_file(&self) -> bool {
        !matches!(self, CompilerVariant::D8)
    }

    /// Whether a mapping output is requested; l8 only shrinks when it has a
    /// configuration file
    pub fn emits_mapping(&self, has_config_file: bool) -> bool {
        match self {
            CompilerVariant::D8 => false,
            CompilerVariant::L8 => has_config_file,
            CompilerVariant::R8 | CompilerVariant::R8Full => true,
        }
    }

    fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CompilerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompilerVariant {
    type Err = CompileDumpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CompileDumpError::config(format!(
                    "Unable to determine a compiler to use. Specified {}, Valid options: {}",
                    s,
                    Self::valid_options()
                ))
            })
    }
}

/// Tri-state override for a shrinker configuration toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    /// Keep whatever the dumped configuration says
    #[default]
    Default,
    ForceEnable,
    ForceDisable,
}

/// The decided values for one replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInvocation {
    pub compiler: CompilerVariant,
    pub min_api: Option<String>,
    pub output: PathBuf,
    pub classfile: bool,
    pub android_platform_build: bool,
    pub enable_missing_library_api_modeling: bool,
}

/// Command line values that participate in resolution
#[derive(Debug, Clone, Default)]
pub struct ResolutionInputs<'a> {
    pub compiler: Option<&'a str>,
    pub min_api: Option<&'a str>,
    pub classfile: bool,
    pub android_platform_build: bool,
    pub enable_missing_library_api_modeling: bool,
}

impl ResolvedInvocation {
    pub fn resolve(
        inputs: &ResolutionInputs<'_>,
        properties: &BuildProperties,
        work_dir: &Path,
    ) -> Result<Self> {
        let resolved = Self {
            compiler: resolve_compiler(inputs.compiler, properties)?,
            min_api: resolve_min_api(inputs.min_api, properties),
            output: work_dir.join("out.jar"),
            classfile: inputs.classfile || properties.contains_key("classfile"),
            android_platform_build: inputs.android_platform_build
                || properties.is_true("android-platform-build"),
            enable_missing_library_api_modeling: inputs.enable_missing_library_api_modeling
                || properties.is_true("enable-missing-library-api-modeling"),
        };
        debug!("Resolved invocation: {:?}", resolved);
        Ok(resolved)
    }
}

/// Pick the compiler. A `tool=r8` dump needs `force-proguard-compatibility`
/// to tell compat mode from full mode.
pub fn resolve_compiler(
    requested: Option<&str>,
    properties: &BuildProperties,
) -> Result<CompilerVariant> {
    if let Some(requested) = requested {
        return requested.parse();
    }

    let Some(tool) = properties.get("tool") else {
        return Err(CompileDumpError::config(format!(
            "Unable to determine a compiler to use. Specified none, Valid options: {}",
            CompilerVariant::valid_options()
        )));
    };

    let tool = tool.to_lowercase();
    if tool == "r8" {
        let compat = properties.get("force-proguard-compatibility").ok_or_else(|| {
            CompileDumpError::config(
                "Unable to determine R8 compiler variant from build.properties. \
                 No value for 'force-proguard-compatibility'.",
            )
        })?;
        if compat.eq_ignore_ascii_case("false") {
            return Ok(CompilerVariant::R8Full);
        }
    }
    tool.parse()
}

pub fn resolve_min_api(requested: Option<&str>, properties: &BuildProperties) -> Option<String> {
    requested
        .or_else(|| properties.get("min-api"))
        .map(str::to_string)
}
