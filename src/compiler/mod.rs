// file: src/compiler/mod.rs
// version: 1.0.0
// guid: 9eb1a41d-f27b-47c0-a9d8-889acc53896f

//! Running the compiler: JDK lookup, shim compilation, command assembly and
//! process execution

pub mod command;
pub mod executor;
pub mod jdk;
pub mod wrapper;

pub use command::{CompilePlan, JvmOptions};
pub use executor::{run_captured, run_checked, CapturedRun};
pub use jdk::Jdk;
