// file: src/cli/args.rs
// version: 1.0.0
// guid: db06457e-e6cd-44ff-8e5f-66104e3e2c37

//! Command line argument definitions

use crate::compiler::JvmOptions;
use crate::config::{ShrinkerToggles, Toggle};
use crate::replay::ReplayOptions;
use clap::{CommandFactory, Parser};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compiledump")]
#[command(about = "Compile a dump artifact")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// List a summary of the contents of the dumps given as trailing arguments
    #[arg(long)]
    pub summary: bool,

    /// Dump file or directory to compile
    #[arg(short, long)]
    pub dump: Option<PathBuf>,

    /// Directory to extract the dump to, so the command can be rerun with changes
    #[arg(long)]
    pub temp: Option<PathBuf>,

    /// Compiler to use: d8, r8, r8full or l8
    #[arg(short, long)]
    pub compiler: Option<String>,

    /// Force enable/disable minification (defaults to the dump's configuration)
    #[arg(long, value_enum, default_value = "default")]
    pub minify: ToggleArg,

    /// Force enable/disable optimizations (defaults to the dump's configuration)
    #[arg(long, value_enum, default_value = "default")]
    pub optimize: ToggleArg,

    /// Force enable/disable shrinking (defaults to the dump's configuration)
    #[arg(long, value_enum, default_value = "default")]
    pub shrink: ToggleArg,

    /// Compiler version: "main" for the in-tree build, "source" for build
    /// classes, "X.Y.Z" for a release or a 40 character hash from main.
    /// Defaults to the dump's version file.
    #[arg(short, long)]
    pub version: Option<String>,

    /// Path to a compiler jar, bypassing version resolution
    #[arg(long)]
    pub r8_jar: Option<PathBuf>,

    /// Additional option(s) for the JVM running the compiler
    #[arg(long, alias = "r8_flags", allow_hyphen_values = true)]
    pub r8_flags: Option<String>,

    /// Re-extract the dump even if the temp directory already holds one
    #[arg(long = "override")]
    pub override_extraction: bool,

    /// Use the non-lib distribution (default uses the lib distribution)
    #[arg(long)]
    pub nolib: bool,

    /// Print timing information from the compiler
    #[arg(long)]
    pub print_times: bool,

    /// Enable Java assertions when running the compiler
    #[arg(long)]
    pub ea: bool,

    /// Run with classfile output
    #[arg(long)]
    pub classfile: bool,

    /// Enable the Java debug agent and suspend compilation
    #[arg(long)]
    pub debug_agent: bool,

    /// JVM max heap size (-Xmx)
    #[arg(long)]
    pub xmx: Option<String>,

    /// Number of compiler threads
    #[arg(long)]
    pub threads: Option<String>,

    /// Min API level (defaults to the dump's build properties)
    #[arg(long)]
    pub min_api: Option<String>,

    /// Desugared library configuration (defaults to the dump's)
    #[arg(long)]
    pub desugared_lib: Option<PathBuf>,

    /// Do not pass a desugared library configuration even if the dump has one
    #[arg(long)]
    pub disable_desugared_lib: bool,

    /// Run the compilation in a loop until interrupted
    #[arg(long = "loop")]
    pub loop_forever: bool,

    /// Run with missing library API modeling
    #[arg(long)]
    pub enable_missing_library_api_modeling: bool,

    /// Run as a platform build
    #[arg(long)]
    pub android_platform_build: bool,

    /// Tool configuration file
    #[arg(long, env = "COMPILEDUMP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Compiler checkout used by "main", "source", shims and retrace
    #[arg(long, env = "R8_ROOT")]
    pub repo_root: Option<PathBuf>,

    /// JDK used to compile shims and run the compiler
    #[arg(long, env = "JAVA_HOME")]
    pub java_home: Option<PathBuf>,

    /// Base URL of the artifact store
    #[arg(long)]
    pub storage_url: Option<String>,

    #[arg(long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,

    /// Dumps to summarize with --summary; otherwise forwarded to the compiler.
    /// Unrecognized flags may appear anywhere and keep their relative order.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

/// Toggle argument for CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleArg {
    Default,
    ForceEnable,
    ForceDisable,
}

impl From<ToggleArg> for Toggle {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::Default => Toggle::Default,
            ToggleArg::ForceEnable => Toggle::ForceEnable,
            ToggleArg::ForceDisable => Toggle::ForceDisable,
        }
    }
}

impl Cli {
    /// Parse `args`, collecting unrecognized flags wherever they appear
    pub fn parse_known_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(split_known_args(args))
    }

    /// Fallible form of [`Cli::parse_known_from`]
    pub fn try_parse_known_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(split_known_args(args))
    }

    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions {
            dump: self.dump.clone(),
            compiler: self.compiler.clone(),
            toggles: ShrinkerToggles {
                minify: self.minify.into(),
                optimize: self.optimize.into(),
                shrink: self.shrink.into(),
            },
            version: self.version.clone(),
            r8_jar: self.r8_jar.clone(),
            override_extraction: self.override_extraction,
            nolib: self.nolib,
            jvm: JvmOptions {
                debug_agent: self.debug_agent,
                max_heap: self.xmx.clone(),
                enable_assertions: self.ea,
                print_times: self.print_times,
                extra_flags: self.r8_flags.clone(),
            },
            classfile: self.classfile,
            threads: self.threads.clone(),
            min_api: self.min_api.clone(),
            desugared_lib: self.desugared_lib.clone(),
            disable_desugared_lib: self.disable_desugared_lib,
            enable_missing_library_api_modeling: self.enable_missing_library_api_modeling,
            android_platform_build: self.android_platform_build,
            passthrough: self.rest.clone(),
        }
    }

    /// Trailing arguments read as dump paths
    pub fn summary_paths(&self) -> Vec<PathBuf> {
        self.rest.iter().map(PathBuf::from).collect()
    }
}

/// Known flags mapped to whether they take a separate value
fn known_flags() -> HashMap<String, bool> {
    let mut command = Cli::command();
    command.build();

    let mut known = HashMap::new();
    for arg in command.get_arguments() {
        let takes_value = arg.get_action().takes_values();
        if let Some(long) = arg.get_long() {
            known.insert(format!("--{}", long), takes_value);
        }
        for alias in arg.get_all_aliases().unwrap_or_default() {
            known.insert(format!("--{}", alias), takes_value);
        }
        if let Some(short) = arg.get_short() {
            known.insert(format!("-{}", short), takes_value);
        }
    }
    known
}

/// Returns `(takes_value, value_attached)` for a recognized flag token
fn lookup_flag(known: &HashMap<String, bool>, token: &str) -> Option<(bool, bool)> {
    let (name, attached) = match token.split_once('=') {
        Some((name, _)) => (name, true),
        None => (token, false),
    };
    if let Some(&takes_value) = known.get(name) {
        return Some((takes_value, attached));
    }
    // `-dVALUE`
    if !token.starts_with("--") && token.len() > 2 {
        if let Some(&takes_value) = token.get(..2).and_then(|short| known.get(short)) {
            return Some((takes_value, true));
        }
    }
    None
}

/// Move every token that is not a known flag (or its value) behind `--`,
/// preserving order, so clap parses known flags anywhere on the line and
/// the remainder lands in the trailing arguments.
pub fn split_known_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = known_flags();
    let mut args = args.into_iter().map(Into::into);
    let mut head: Vec<OsString> = args.next().into_iter().collect();
    let mut tail = Vec::new();

    while let Some(arg) = args.next() {
        let flag = match arg.to_str() {
            Some("--") => {
                tail.extend(args.by_ref());
                break;
            }
            Some(token) => lookup_flag(&known, token),
            None => None,
        };
        match flag {
            Some((takes_value, attached)) => {
                head.push(arg);
                if takes_value && !attached {
                    head.extend(args.next());
                }
            }
            None => tail.push(arg),
        }
    }

    if !tail.is_empty() {
        head.push(OsString::from("--"));
        head.extend(tail);
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "compiledump",
            "-d",
            "dump.zip",
            "--temp",
            "/tmp/w",
            "-c",
            "r8full",
            "--minify",
            "force-disable",
            "-v",
            "8.2.47",
            "--r8-flags",
            "-Dx=1 -Dy",
            "--xmx",
            "8g",
            "--loop",
            "--override",
            "--threads",
            "4",
            "--",
            "--debug",
            "--no-tree-shaking",
        ])
        .unwrap();

        assert_eq!(cli.dump, Some(PathBuf::from("dump.zip")));
        assert!(cli.loop_forever);
        assert!(cli.override_extraction);
        assert_eq!(cli.rest, vec!["--debug", "--no-tree-shaking"]);

        let options = cli.replay_options();
        assert_eq!(options.compiler.as_deref(), Some("r8full"));
        assert_eq!(options.version.as_deref(), Some("8.2.47"));
        assert_eq!(options.toggles.minify, Toggle::ForceDisable);
        assert_eq!(options.toggles.shrink, Toggle::Default);
        assert_eq!(options.jvm.max_heap.as_deref(), Some("8g"));
        assert_eq!(options.jvm.extra_flags.as_deref(), Some("-Dx=1 -Dy"));
        assert_eq!(options.threads.as_deref(), Some("4"));
    }

    #[test]
    fn test_underscore_flag_alias() {
        let cli = Cli::try_parse_from(["compiledump", "--r8_flags", "-ea"]).unwrap();
        assert_eq!(cli.r8_flags.as_deref(), Some("-ea"));
    }

    #[test]
    fn test_summary_paths() {
        let cli = Cli::try_parse_from(["compiledump", "--summary", "a.zip", "b"]).unwrap();
        assert!(cli.summary);
        assert_eq!(
            cli.summary_paths(),
            vec![PathBuf::from("a.zip"), PathBuf::from("b")]
        );
    }

    #[test]
    fn test_unknown_flags_before_known_flags() {
        let cli = Cli::try_parse_known_from([
            "compiledump",
            "--no-tree-shaking",
            "-d",
            "dump.zip",
            "--min-api",
            "21",
            "--debug",
        ])
        .unwrap();

        assert_eq!(cli.dump, Some(PathBuf::from("dump.zip")));
        assert_eq!(cli.min_api.as_deref(), Some("21"));
        assert_eq!(cli.rest, vec!["--no-tree-shaking", "--debug"]);
    }

    #[test]
    fn test_known_flags_after_summary_paths() {
        let cli =
            Cli::try_parse_known_from(["compiledump", "--summary", "a.zip", "--nolib", "b.zip"])
                .unwrap();

        assert!(cli.summary);
        assert!(cli.nolib);
        assert_eq!(cli.rest, vec!["a.zip", "b.zip"]);
    }

    #[test]
    fn test_split_keeps_flag_values_and_separator() {
        let split = split_known_args([
            "compiledump",
            "--r8-flags",
            "-Dx=1",
            "-ddump.zip",
            "--threads=4",
            "--",
            "-q",
        ]);

        assert_eq!(
            split,
            vec![
                "compiledump",
                "--r8-flags",
                "-Dx=1",
                "-ddump.zip",
                "--threads=4",
                "--",
                "-q"
            ]
        );
    }

    #[test]
    fn test_help_is_still_recognized() {
        let err = Cli::try_parse_known_from(["compiledump", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_invalid_toggle_rejected() {
        assert!(Cli::try_parse_from(["compiledump", "--shrink", "sometimes"]).is_err());
    }
}
