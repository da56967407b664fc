// file: src/main.rs
// version: 1.0.0
// guid: f0a48076-f7aa-450a-aa5f-fc1559f4bb10

//! compiledump - Main entry point

use compile_dump::{
    cli::{args::Cli, commands},
    logging::logger,
};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_known_from(std::env::args_os());

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("{}", e);
    }

    match commands::run(&cli).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            error!("{}", e);
            println!("{}", e);
            ExitCode::from(1)
        }
    }
}
