// file: src/logging/mod.rs
// version: 1.0.0
// guid: 5d407ca6-bbab-44e4-bd31-2df42511b532

//! Logging system for compile-dump

pub mod logger;

pub use logger::init_logger;
