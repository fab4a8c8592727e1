//! CLI Command Definitions
//!
//! Argument parsing for the gramwatch holder analytics tool.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gramwatch - Jetton Holder Concentration Analytics for TON
#[derive(Parser, Debug)]
#[command(
    name = "gramwatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Jetton holder concentration analytics via TonAPI",
    long_about = "gramwatch ingests the holder list of a jetton master account from the \
                  rate-limited TonAPI index and derives concentration analytics: ranked \
                  balances, top-10/100/1000 supply shares, and sortable paginated views."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a full snapshot and print the concentration report
    Report(ReportCmd),

    /// Browse the holder list with sorting, search and paging
    Holders(HoldersCmd),

    /// Print the jetton metadata
    Meta(MetaCmd),

    /// Look up the current fiat price
    Price(PriceCmd),

    /// Store or clear the TonAPI credential
    SetKey(SetKeyCmd),
}

/// Concentration report
#[derive(Parser, Debug)]
pub struct ReportCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Number of top holders to list
    #[arg(short, long, value_name = "N", default_value = "25")]
    pub top: usize,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Skip the fiat price lookup
    #[arg(long)]
    pub no_price: bool,
}

/// Holder list browsing
#[derive(Parser, Debug)]
pub struct HoldersCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Sort field: rank, address, tag, balance, change, share
    #[arg(short, long, value_name = "FIELD", default_value = "rank")]
    pub sort: String,

    /// Sort direction: asc or desc
    #[arg(short, long, value_name = "DIR", default_value = "asc")]
    pub direction: String,

    /// Page index (0-based)
    #[arg(short, long, value_name = "N", default_value = "0")]
    pub page: usize,

    /// Holders per page
    #[arg(long, value_name = "N", default_value = "50")]
    pub page_size: usize,

    /// Filter by address substring (raw or friendly form)
    #[arg(long, value_name = "NEEDLE")]
    pub search: Option<String>,
}

/// Jetton metadata
#[derive(Parser, Debug)]
pub struct MetaCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Fiat price lookup
#[derive(Parser, Debug)]
pub struct PriceCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Keep polling on the configured interval
    #[arg(short, long)]
    pub watch: bool,
}

/// Credential management
#[derive(Parser, Debug)]
pub struct SetKeyCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// The bearer credential to store
    #[arg(value_name = "KEY", required_unless_present = "clear")]
    pub key: Option<String>,

    /// Remove the stored credential instead
    #[arg(long, conflicts_with = "key")]
    pub clear: bool,
}
