// file: src/compiler/executor.rs
// version: 1.0.0
// guid: 31a014ec-49e3-4f6f-a1bf-442588640304

//! Captured subprocess execution

use crate::error::CompileDumpError;
use crate::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use subprocess::{Exec, ExitStatus, Redirection};
use tracing::{debug, info};

/// Outcome of a finished process; stdout and stderr are interleaved in
/// `output`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRun {
    pub success: bool,
    pub code: Option<i32>,
    pub output: String,
}

/// Render a command line the way a user would paste it in a shell
pub fn format_command(program: &Path, args: &[OsString]) -> String {
    std::iter::once(program.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` to completion, capturing combined output. A non-zero exit
/// is reported in the result, not as an error.
pub async fn run_captured(program: &Path, args: &[OsString]) -> Result<CapturedRun> {
    info!("Running: {}", format_command(program, args));

    let program: PathBuf = program.to_path_buf();
    let args = args.to_vec();
    let capture = tokio::task::spawn_blocking(move || {
        Exec::cmd(&program)
            .args(&args[..])
            .stdout(Redirection::Pipe)
            .stderr(Redirection::Merge)
            .capture()
            .map_err(|e| {
                CompileDumpError::execution(format!(
                    "Failed to execute {}: {}",
                    program.display(),
                    e
                ))
            })
    })
    .await
    .map_err(|e| CompileDumpError::execution(format!("Process task failed: {}", e)))??;

    let code = match capture.exit_status {
        ExitStatus::Exited(code) => Some(code as i32),
        _ => None,
    };
    debug!("Process finished with {:?}", capture.exit_status);

    Ok(CapturedRun {
        success: capture.exit_status.success(),
        code,
        output: capture.stdout_str(),
    })
}

/// Like [`run_captured`], but a non-zero exit is an error carrying the output
pub async fn run_checked(program: &Path, args: &[OsString]) -> Result<String> {
    let run = run_captured(program, args).await?;
    if !run.success {
        return Err(CompileDumpError::execution(format!(
            "{} failed with exit code {:?}:\n{}",
            program.display(),
            run.code,
            run.output
        )));
    }
    Ok(run.output)
}
