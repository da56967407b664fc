// file: src/cli/commands.rs
// version: 1.0.0
// guid: 68a48323-32de-49dc-b390-31cdce83556c

//! Command implementations for the CLI

use super::args::Cli;
use crate::{
    config::{loader::ConfigLoader, ToolConfig},
    dump::summarize_dump_files,
    logging::logger::with_async_operation_span,
    replay::{replay_dump, ReplayHooks, ReplayOptions, ReplayStatus},
    Result,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolve the tool configuration from file, environment and flags
pub fn load_tool_config(cli: &Cli) -> Result<ToolConfig> {
    let loader = ConfigLoader::new();
    let config = loader.load(cli.config.as_deref())?;
    Ok(config.with_overrides(
        cli.repo_root.as_deref(),
        cli.java_home.as_deref(),
        cli.storage_url.as_deref(),
    ))
}

/// Dispatch to summary, loop or single compilation
pub async fn run(cli: &Cli) -> Result<ReplayStatus> {
    if cli.summary {
        summary_command(&cli.summary_paths())?;
        return Ok(ReplayStatus::Succeeded);
    }

    let tools = load_tool_config(cli)?;
    let options = cli.replay_options();
    if cli.loop_forever {
        loop_command(cli.temp.as_deref(), &options, &tools).await
    } else {
        compile_command(cli.temp.as_deref(), &options, &tools).await
    }
}

/// Summarize dumps to stdout
pub fn summary_command(dumps: &[PathBuf]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    summarize_dump_files(dumps, &mut out)
}

/// Compile the dump once
pub async fn compile_command(
    temp: Option<&Path>,
    options: &ReplayOptions,
    tools: &ToolConfig,
) -> Result<ReplayStatus> {
    replay_dump(temp, options, tools, &ReplayHooks::default()).await
}

/// Iteration directory `NNN` under the temp directory, when one is configured
pub fn iteration_dir(temp: Option<&Path>, iteration: u64) -> Option<PathBuf> {
    temp.map(|dir| dir.join(format!("{:03}", iteration)))
}

/// Compile the dump over and over until the process is interrupted
pub async fn loop_command(
    temp: Option<&Path>,
    options: &ReplayOptions,
    tools: &ToolConfig,
) -> Result<ReplayStatus> {
    let hooks = ReplayHooks::default();
    let mut iteration: u64 = 1;
    loop {
        println!("Iteration {:03}", iteration);
        let out = iteration_dir(temp, iteration);
        let status = with_async_operation_span("iteration", || {
            replay_dump(out.as_deref(), options, tools, &hooks)
        })
        .await?;
        info!("Iteration {:03} finished: {:?}", iteration, status);
        iteration += 1;
    }
}
