//! CLI Adapter
//!
//! Command-line interface for the holder analytics tool.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    CliApp, Command, HoldersCmd, MetaCmd, PriceCmd, ReportCmd, SetKeyCmd,
};
