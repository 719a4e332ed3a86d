use std::path::PathBuf;

use clap::Parser;

use super::commands::Commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path (YAML, §6 layered loading)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Named preset (default/fast/realistic/debug/tolerant); overrides `--config`
    #[arg(long)]
    pub preset: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable debug-level logging regardless of `--log-level`
    #[arg(short, long)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, default_value = "human")]
    pub output: super::output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}
