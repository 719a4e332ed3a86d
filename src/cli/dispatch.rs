use super::commands::Commands;
use super::config::cmd_config;
use super::context::CliContext;
use super::env::CliArgs;
use super::info::cmd_info;
use super::replay::cmd_replay;
use super::step::cmd_step;
use crate::errors::AppResult;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> AppResult<()> {
    match &cli.command {
        Commands::Replay(args) => cmd_replay(args.clone(), ctx, cli.output.clone()).await,
        Commands::Step(args) => cmd_step(args.clone(), ctx, cli.output.clone()).await,
        Commands::Config(args) => cmd_config(args.clone(), ctx, cli.output.clone()).await,
        Commands::Info => cmd_info(ctx, cli.output.clone()).await,
    }
}
