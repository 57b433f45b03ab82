//! CLI Adapter
//!
//! Command-line interface for spreadwatch.
//! Uses clap derive macros for argument parsing.

mod commands;
pub mod output;

pub use commands::{AlertCmd, CliApp, Command, NotifyCmd, OutputFormat, ScanCmd, SignalCmd};
