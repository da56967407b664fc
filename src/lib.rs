// file: src/lib.rs
// version: 1.0.0
// guid: 51d53e79-ff15-4266-95e5-c35ece7806ea

//! # compile-dump
//!
//! Reproduces a D8/R8 compiler invocation captured in a dump artifact. A dump
//! is staged into a working directory, its build properties are merged with the
//! command line, a compiler distribution is located or downloaded, and the
//! reconstructed command is executed. Crashes from obfuscated distributions can
//! be retraced on the way out.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod distribution;
pub mod dump;
pub mod error;
pub mod logging;
pub mod network;
pub mod replay;
pub mod retrace;

pub use error::{CompileDumpError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
