//! Command-line interface for glyphline
//!
//! The `glyphline` binary lives in `main.rs`; argument parsing, escape
//! decoding and the render/dry-run logic live here so they can be tested
//! without spawning a process.

pub mod cli;
pub mod render;
pub mod unescape;

pub use cli::Cli;
pub use render::run;
