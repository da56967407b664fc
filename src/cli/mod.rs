// file: src/cli/mod.rs
// version: 1.0.0
// guid: 26d39230-5209-45ec-889d-e52731444840

//! Command line interface for compile-dump

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
