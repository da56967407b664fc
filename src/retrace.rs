// file: src/retrace.rs
// version: 1.0.0
// guid: f06eda49-465f-4849-91ec-7aaf001ef964

//! Best-effort retracing of compiler crashes
//!
//! Library distributions are obfuscated, so a crash trace from them is only
//! readable after mapping it back through the distribution's symbol map.

use crate::compiler::{run_checked, Jdk};
use crate::config::ToolConfig;
use crate::distribution::{storage::R8LIB_MAP, ArtifactStore, VersionToken};
use crate::error::CompileDumpError;
use crate::network::NetworkDownloader;
use crate::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const RETRACE_MAIN_CLASS: &str = "com.android.tools.r8.retrace.Retrace";
const BANNER_WIDTH: usize = 80;

/// Where the symbol map for a version comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapSource {
    Local(PathBuf),
    Remote(String),
}

/// Retracing applies only to obfuscated builds: not `--nolib`, not `source`
pub fn should_retrace(version: Option<&VersionToken>, nolib: bool) -> bool {
    !nolib && matches!(version, Some(v) if *v != VersionToken::Source)
}

pub fn map_source(version: &VersionToken, tools: &ToolConfig) -> Option<MapSource> {
    match version {
        VersionToken::Main => Some(MapSource::Local(tools.r8lib_map())),
        VersionToken::Source => None,
        VersionToken::Hash(_) | VersionToken::Release(_) => ArtifactStore::new(&tools.storage_url)
            .artifact_url(version, R8LIB_MAP)
            .map(MapSource::Remote),
    }
}

/// The banner printed above retraced output
pub fn banner() -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("{}\n RETRACED OUTPUT\n{}", rule, rule)
}

async fn fetch_map(
    version: &VersionToken,
    work_dir: &Path,
    tools: &ToolConfig,
    downloader: &NetworkDownloader,
) -> Result<PathBuf> {
    match map_source(version, tools) {
        Some(MapSource::Local(path)) if path.exists() => Ok(path),
        Some(MapSource::Local(path)) => Err(CompileDumpError::retrace(format!(
            "Could not find map file {} for version {}",
            path.display(),
            version
        ))),
        Some(MapSource::Remote(url)) => {
            if !downloader.exists(&url).await? {
                return Err(CompileDumpError::retrace(format!(
                    "Could not find map file from argument: {}",
                    version
                )));
            }
            let dest = work_dir.join("mapping.map");
            downloader.download(&url, &dest).await?;
            Ok(dest)
        }
        None => Err(CompileDumpError::retrace(format!(
            "No map file for version {}",
            version
        ))),
    }
}

/// Retrace `output` and return the readable trace
pub async fn retrace_output(
    output: &str,
    version: &VersionToken,
    work_dir: &Path,
    tools: &ToolConfig,
    jdk: &Jdk,
    downloader: &NetworkDownloader,
) -> Result<String> {
    let stacktrace = work_dir.join("stacktrace");
    tokio::fs::write(&stacktrace, output).await?;

    let map = fetch_map(version, work_dir, tools, downloader).await?;
    let args = vec![
        OsString::from("-cp"),
        tools.r8lib_jar().into_os_string(),
        OsString::from(RETRACE_MAIN_CLASS),
        map.into_os_string(),
        stacktrace.into_os_string(),
    ];
    run_checked(&jdk.java()?, &args).await
}

/// Print the retraced form of `output`. Returns false, after reporting why,
/// when retracing was not possible; the caller then prints `output` as is.
pub async fn try_retrace_output(
    output: &str,
    version: &VersionToken,
    work_dir: &Path,
    tools: &ToolConfig,
    jdk: &Jdk,
    downloader: &NetworkDownloader,
) -> bool {
    match retrace_output(output, version, work_dir, tools, jdk, downloader).await {
        Ok(retraced) => {
            println!("{}", banner());
            println!("{}", retraced);
            true
        }
        Err(e) => {
            warn!("Failed to retrace for version: {}", version);
            warn!("{}", e);
            info!("Printing raw compiler output");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> ToolConfig {
        ToolConfig {
            repo_root: PathBuf::from("/r8"),
            storage_url: "https://store.test/raw".to_string(),
            ..ToolConfig::default()
        }
    }

    #[test]
    fn test_should_retrace() {
        let release = VersionToken::parse("8.2.47");
        assert!(should_retrace(Some(&release), false));
        assert!(should_retrace(Some(&VersionToken::Main), false));
        assert!(!should_retrace(Some(&release), true));
        assert!(!should_retrace(Some(&VersionToken::Source), false));
        assert!(!should_retrace(None, false));
    }

    #[test]
    fn test_map_sources() {
        assert_eq!(
            map_source(&VersionToken::Main, &tools()),
            Some(MapSource::Local(PathBuf::from("/r8/build/libs/r8lib.jar.map")))
        );
        assert_eq!(
            map_source(&VersionToken::parse("8.2.47"), &tools()),
            Some(MapSource::Remote(
                "https://store.test/raw/8.2.47/r8lib.jar.map".to_string()
            ))
        );
        assert_eq!(map_source(&VersionToken::Source, &tools()), None);
    }

    #[test]
    fn test_banner() {
        let banner = banner();
        let lines: Vec<_> = banner.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1], " RETRACED OUTPUT");
    }

    #[tokio::test]
    async fn test_missing_local_map_is_error() {
        let work = tempfile::tempdir().unwrap();
        let tools = ToolConfig {
            repo_root: work.path().join("checkout"),
            ..tools()
        };

        let err = fetch_map(&VersionToken::Main, work.path(), &tools, &NetworkDownloader::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CompileDumpError::RetraceError(_)));
        assert!(err.to_string().contains("Could not find map file"));
    }

    #[tokio::test]
    async fn test_local_map_is_used_in_place() {
        let work = tempfile::tempdir().unwrap();
        let tools = ToolConfig {
            repo_root: work.path().to_path_buf(),
            ..tools()
        };
        std::fs::create_dir_all(work.path().join("build/libs")).unwrap();
        std::fs::write(tools.r8lib_map(), "# map").unwrap();

        let map = fetch_map(&VersionToken::Main, work.path(), &tools, &NetworkDownloader::new())
            .await
            .unwrap();

        assert_eq!(map, tools.r8lib_map());
    }

    #[tokio::test]
    async fn test_failed_retrace_is_swallowed() {
        let work = tempfile::tempdir().unwrap();
        let jdk = Jdk::new(Some(Path::new("/nonexistent/jdk")));

        let retraced = try_retrace_output(
            "Exception in thread main a.b.c",
            &VersionToken::Main,
            work.path(),
            &tools(),
            &jdk,
            &NetworkDownloader::new(),
        )
        .await;

        assert!(!retraced);
        assert!(work.path().join("stacktrace").exists());
    }
}
