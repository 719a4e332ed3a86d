use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_effective_config};

pub async fn run() -> Result<()> {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level, cli.debug)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting replay-core");

    let config = load_effective_config(cli.config.as_deref(), cli.preset.as_deref())?;
    let ctx = CliContext::new(config);

    if let Err(err) = dispatch(&cli, &ctx).await {
        error!(error = %err, "command failed");
        return Err(err.into());
    }
    info!("command completed successfully");
    Ok(())
}
