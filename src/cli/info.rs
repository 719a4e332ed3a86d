use element_finder::Strategy;

use super::context::CliContext;
use super::output::OutputFormat;
use crate::errors::AppResult;

pub async fn cmd_info(ctx: &CliContext, output: OutputFormat) -> AppResult<()> {
    let priority: Vec<&'static str> = Strategy::default_priority().iter().map(|s| s.name()).collect();

    match output {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "buildDate": option_env!("BUILD_DATE").unwrap_or("unknown"),
                "gitHash": option_env!("GIT_HASH").unwrap_or("unknown"),
                "defaultStrategyPriority": priority,
                "config": ctx.config(),
            });
            println!("{}", serde_json::to_string_pretty(&value).expect("info payload always serializes"));
        }
        OutputFormat::Human => {
            println!("replay-core {}", env!("CARGO_PKG_VERSION"));
            println!("build date: {}", option_env!("BUILD_DATE").unwrap_or("unknown"));
            println!("git commit: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
            println!("default strategy priority: {}", priority.join(" > "));
        }
    }
    Ok(())
}
