use clap::{Args, Subcommand};

use super::context::CliContext;
use super::output::OutputFormat;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};

/// Show or validate the replay configuration, or print one of the named
/// presets (§6: `default`, `fast`, `realistic`, `debug`, `tolerant`).
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration (file/env-layered, or the
    /// `--preset` override) this invocation resolved
    Show,

    /// Validate the effective configuration without running anything
    Validate,

    /// Print one named preset, ignoring `--config`/`--preset`
    Preset {
        /// default | fast | realistic | debug | tolerant
        name: String,
    },
}

fn print_config(config: &AppConfig, output: OutputFormat) -> AppResult<()> {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(config).expect("AppConfig always serializes")
            );
        }
        OutputFormat::Human => {
            println!("{}", serde_yaml::to_string(config).expect("AppConfig always serializes"));
        }
    }
    Ok(())
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext, output: OutputFormat) -> AppResult<()> {
    match args.action {
        ConfigAction::Show => print_config(ctx.config(), output),
        ConfigAction::Validate => {
            ctx.config().replay.validate().map_err(AppError::Config)?;
            match output {
                OutputFormat::Json => println!("{{\"valid\":true}}"),
                OutputFormat::Human => println!("configuration is valid"),
            }
            Ok(())
        }
        ConfigAction::Preset { name } => {
            let config = AppConfig {
                replay: replay_config::preset(&name)?,
                ..AppConfig::default()
            };
            print_config(&config, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn showing_default_config_succeeds() {
        let ctx = CliContext::new(AppConfig::default());
        assert!(cmd_config(
            ConfigArgs { action: ConfigAction::Show },
            &ctx,
            OutputFormat::Json
        )
        .await
        .is_ok());
    }

    #[tokio::test]
    async fn unknown_preset_is_rejected() {
        let ctx = CliContext::new(AppConfig::default());
        let err = cmd_config(
            ConfigArgs {
                action: ConfigAction::Preset { name: "bogus".to_string() },
            },
            &ctx,
            OutputFormat::Human,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
