// file: src/network/mod.rs
// version: 1.0.0
// guid: eedafc40-eac0-43ef-9a9c-012905abb812

//! Network operations module

pub mod download;

pub use download::NetworkDownloader;
