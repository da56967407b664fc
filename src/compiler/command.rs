// file: src/compiler/command.rs
// version: 1.0.0
// guid: cd1e68bf-f3c8-4ea1-ba88-120c057a5e60

//! Compiler command line assembly

use crate::config::{CompilerVariant, ResolvedInvocation};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DEBUG_AGENT_FLAG: &str = "-agentlib:jdwp=transport=dt_socket,server=y,suspend=y,address=*:5005";
const TEST_ASSERTIONS_PROPERTY: &str = "-Dcom.android.tools.r8.enableTestAssertions=1";
const PRINT_TIMES_PROPERTY: &str = "-Dcom.android.tools.r8.printtimes=1";

/// Flags for the JVM hosting the compiler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JvmOptions {
    pub debug_agent: bool,
    pub max_heap: Option<String>,
    pub enable_assertions: bool,
    pub print_times: bool,
    /// Space separated flags given verbatim by the user
    pub extra_flags: Option<String>,
}

impl JvmOptions {
    fn args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.debug_agent {
            args.push(OsString::from(DEBUG_AGENT_FLAG));
        }
        if let Some(xmx) = &self.max_heap {
            args.push(OsString::from(format!("-Xmx{}", xmx)));
        }
        if self.enable_assertions {
            args.push(OsString::from("-ea"));
            args.push(OsString::from(TEST_ASSERTIONS_PROPERTY));
        }
        if self.print_times {
            args.push(OsString::from(PRINT_TIMES_PROPERTY));
        }
        if let Some(flags) = &self.extra_flags {
            args.extend(flags.split_whitespace().map(OsString::from));
        }
        args
    }
}

/// Everything needed to run the compiler on a staged dump
#[derive(Debug, Clone)]
pub struct CompilePlan {
    pub jvm: JvmOptions,
    /// `-D` flags, already formatted
    pub system_properties: Vec<String>,
    pub classpath: OsString,
    pub invocation: ResolvedInvocation,
    pub work_dir: PathBuf,
    pub program_jar: PathBuf,
    pub feature_jars: Vec<PathBuf>,
    pub library_jar: Option<PathBuf>,
    pub classpath_jar: Option<PathBuf>,
    pub desugared_library: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub main_dex_rules: Option<PathBuf>,
    pub threads: Option<String>,
    /// Unrecognized command line tokens, appended last
    pub passthrough: Vec<String>,
}

/// `feature-1.jar` is written to `<work>/feature-1.out.jar`
pub fn feature_output(feature_jar: &Path, work_dir: &Path) -> PathBuf {
    let stem = feature_jar
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    work_dir.join(format!("{}.out.jar", stem))
}

fn mapping_output(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".map");
    PathBuf::from(name)
}

impl CompilePlan {
    /// Arguments for `java`, in the order the compiler expects them
    pub fn args(&self) -> Vec<OsString> {
        let compiler = self.invocation.compiler;
        let mut args = self.jvm.args();

        args.extend(self.system_properties.iter().map(OsString::from));
        args.push(OsString::from("-cp"));
        args.push(self.classpath.clone());
        args.push(OsString::from(compiler.entry_point()));
        if compiler.requires_compat_flag() {
            args.push(OsString::from("--compat"));
        }

        args.push(self.program_jar.clone().into_os_string());
        push_flag(&mut args, "--output", &self.invocation.output);

        for feature_jar in &self.feature_jars {
            args.push(OsString::from("--feature-jar"));
            args.push(feature_jar.clone().into_os_string());
            args.push(feature_output(feature_jar, &self.work_dir).into_os_string());
        }

        if let Some(lib) = &self.library_jar {
            push_flag(&mut args, "--lib", lib);
        }
        if let Some(classpath_jar) = &self.classpath_jar {
            if compiler != CompilerVariant::L8 {
                push_flag(&mut args, "--classpath", classpath_jar);
            }
        }
        if let Some(desugared) = &self.desugared_library {
            push_flag(&mut args, "--desugared-lib", desugared);
        }
        let config_file = self
            .config_file
            .as_ref()
            .filter(|_| compiler.accepts_config_file());
        if let Some(config) = config_file {
            push_flag(&mut args, "--pg-conf", config);
        }
        if let Some(rules) = &self.main_dex_rules {
            push_flag(&mut args, "--main-dex-rules", rules);
        }
        if compiler.emits_mapping(config_file.is_some()) {
            push_flag(
                &mut args,
                "--pg-map-output",
                &mapping_output(&self.invocation.output),
            );
        }

        if let Some(min_api) = &self.invocation.min_api {
            args.push(OsString::from("--min-api"));
            args.push(OsString::from(min_api));
        }
        if self.invocation.classfile {
            args.push(OsString::from("--classfile"));
        }
        if self.invocation.android_platform_build {
            args.push(OsString::from("--android-platform-build"));
        }
        if self.invocation.enable_missing_library_api_modeling {
            args.push(OsString::from("--enable-missing-library-api-modeling"));
        }
        if let Some(threads) = &self.threads {
            args.push(OsString::from("--threads"));
            args.push(OsString::from(threads));
        }

        args.extend(self.passthrough.iter().map(OsString::from));
        args
    }
}

fn push_flag(args: &mut Vec<OsString>, flag: &str, path: &Path) {
    args.push(OsString::from(flag));
    args.push(path.as_os_str().to_os_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(compiler: CompilerVariant) -> ResolvedInvocation {
        ResolvedInvocation {
            compiler,
            min_api: None,
            output: PathBuf::from("/w/out.jar"),
            classfile: false,
            android_platform_build: false,
            enable_missing_library_api_modeling: false,
        }
    }

    fn plan(compiler: CompilerVariant) -> CompilePlan {
        CompilePlan {
            jvm: JvmOptions::default(),
            system_properties: Vec::new(),
            classpath: OsString::from("/w:/dist/r8.jar"),
            invocation: invocation(compiler),
            work_dir: PathBuf::from("/w"),
            program_jar: PathBuf::from("/d/program.jar"),
            feature_jars: Vec::new(),
            library_jar: None,
            classpath_jar: None,
            desugared_library: None,
            config_file: None,
            main_dex_rules: None,
            threads: None,
            passthrough: Vec::new(),
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_minimal_d8_command() {
        assert_eq!(
            strings(plan(CompilerVariant::D8).args()),
            vec![
                "-cp",
                "/w:/dist/r8.jar",
                "com.android.tools.r8.utils.CompileDumpD8",
                "/d/program.jar",
                "--output",
                "/w/out.jar",
            ]
        );
    }

    #[test]
    fn test_full_r8_compat_command() {
        let mut plan = plan(CompilerVariant::R8);
        plan.jvm = JvmOptions {
            debug_agent: true,
            max_heap: Some("8g".to_string()),
            enable_assertions: true,
            print_times: true,
            extra_flags: Some("-Dfoo=1  -Dbar".to_string()),
        };
        plan.system_properties = vec!["-Dcom.android.tools.r8.x=1".to_string()];
        plan.feature_jars = vec![PathBuf::from("/d/feature-1.jar")];
        plan.library_jar = Some(PathBuf::from("/d/library.jar"));
        plan.classpath_jar = Some(PathBuf::from("/d/classpath.jar"));
        plan.desugared_library = Some(PathBuf::from("/d/desugared-library.json"));
        plan.config_file = Some(PathBuf::from("/d/proguard.config"));
        plan.main_dex_rules = Some(PathBuf::from("/d/main-dex-rules.txt"));
        plan.invocation.min_api = Some("21".to_string());
        plan.invocation.classfile = true;
        plan.invocation.android_platform_build = true;
        plan.invocation.enable_missing_library_api_modeling = true;
        plan.threads = Some("4".to_string());
        plan.passthrough = vec!["--debug".to_string()];

        assert_eq!(
            strings(plan.args()),
            vec![
                DEBUG_AGENT_FLAG,
                "-Xmx8g",
                "-ea",
                TEST_ASSERTIONS_PROPERTY,
                PRINT_TIMES_PROPERTY,
                "-Dfoo=1",
                "-Dbar",
                "-Dcom.android.tools.r8.x=1",
                "-cp",
                "/w:/dist/r8.jar",
                "com.android.tools.r8.utils.CompileDumpCompatR8",
                "--compat",
                "/d/program.jar",
                "--output",
                "/w/out.jar",
                "--feature-jar",
                "/d/feature-1.jar",
                "/w/feature-1.out.jar",
                "--lib",
                "/d/library.jar",
                "--classpath",
                "/d/classpath.jar",
                "--desugared-lib",
                "/d/desugared-library.json",
                "--pg-conf",
                "/d/proguard.config",
                "--main-dex-rules",
                "/d/main-dex-rules.txt",
                "--pg-map-output",
                "/w/out.jar.map",
                "--min-api",
                "21",
                "--classfile",
                "--android-platform-build",
                "--enable-missing-library-api-modeling",
                "--threads",
                "4",
                "--debug",
            ]
        );
    }

    #[test]
    fn test_r8_full_has_mapping_but_no_compat() {
        let args = strings(plan(CompilerVariant::R8Full).args());
        assert!(!args.contains(&"--compat".to_string()));
        assert!(args.ends_with(&["--pg-map-output".to_string(), "/w/out.jar.map".to_string()]));
    }

    #[test]
    fn test_l8_skips_classpath_and_maps_only_with_config() {
        let mut plan = plan(CompilerVariant::L8);
        plan.classpath_jar = Some(PathBuf::from("/d/classpath.jar"));
        let args = strings(plan.args());
        assert!(!args.contains(&"--classpath".to_string()));
        assert!(!args.contains(&"--pg-map-output".to_string()));
        assert!(args.contains(&"com.android.tools.r8.L8".to_string()));

        plan.config_file = Some(PathBuf::from("/d/proguard.config"));
        let args = strings(plan.args());
        assert!(args.contains(&"--pg-conf".to_string()));
        assert!(args.contains(&"--pg-map-output".to_string()));
    }

    #[test]
    fn test_d8_ignores_config_file() {
        let mut plan = plan(CompilerVariant::D8);
        plan.config_file = Some(PathBuf::from("/d/proguard.config"));
        let args = strings(plan.args());
        assert!(!args.contains(&"--pg-conf".to_string()));
        assert!(!args.contains(&"--pg-map-output".to_string()));
    }

    #[test]
    fn test_feature_output_name() {
        assert_eq!(
            feature_output(Path::new("/d/feature-2.jar"), Path::new("/w")),
            PathBuf::from("/w/feature-2.out.jar")
        );
    }
}
