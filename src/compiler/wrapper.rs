// file: src/compiler/wrapper.rs
// version: 1.0.0
// guid: 7ac324b2-733c-488b-9298-9b0fa26ff489

//! javac compilation of the dump shim classes

use super::executor::run_checked;
use crate::config::ToolConfig;
use crate::distribution::Distribution;
use crate::Result;
use std::ffi::OsString;
use std::path::Path;

/// Shims that adapt the compiler's entry points to dump arguments
pub const SHIM_CLASSES: [&str; 2] = ["CompileDumpCompatR8", "CompileDumpD8"];

/// `javac <source> -d <work> -cp <distribution>`
pub fn javac_args(source: &Path, work_dir: &Path, classpath: OsString) -> Vec<OsString> {
    vec![
        source.as_os_str().to_os_string(),
        OsString::from("-d"),
        work_dir.as_os_str().to_os_string(),
        OsString::from("-cp"),
        classpath,
    ]
}

/// Compile every shim into `work_dir` against the distribution
pub async fn prepare_shims(
    javac: &Path,
    distribution: &Distribution,
    work_dir: &Path,
    tools: &ToolConfig,
) -> Result<()> {
    let classpath = distribution.classpath_with(None)?;
    for class_name in SHIM_CLASSES {
        let source = tools.shim_source(class_name);
        run_checked(javac, &javac_args(&source, work_dir, classpath.clone())).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_javac_args() {
        let args = javac_args(
            Path::new("/r8/CompileDumpD8.java"),
            Path::new("/w"),
            OsString::from("/dist/r8.jar"),
        );
        assert_eq!(
            args,
            vec!["/r8/CompileDumpD8.java", "-d", "/w", "-cp", "/dist/r8.jar"]
                .into_iter()
                .map(OsString::from)
                .collect::<Vec<_>>()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_javac_is_error() {
        let work = tempfile::tempdir().unwrap();
        let tools = ToolConfig {
            repo_root: work.path().to_path_buf(),
            ..ToolConfig::default()
        };
        let distribution = Distribution::Jar(work.path().join("r8.jar"));

        let result = prepare_shims(Path::new("/bin/sh"), &distribution, work.path(), &tools).await;
        assert!(result.is_err());
    }
}
