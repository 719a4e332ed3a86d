use std::path::PathBuf;

use clap::Args;
use core_types::Step;
use dom_traversal::DomPort;

use super::context::CliContext;
use super::output::OutputFormat;
use crate::app_context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::fixture;

/// Runs one step directly through the step executor, bypassing the
/// engine/session lifecycle (§4.5 "single-step API").
#[derive(Args, Clone, Debug)]
pub struct StepArgs {
    /// JSON file holding a single `Step` object
    #[arg(long, value_name = "FILE")]
    pub step: PathBuf,

    /// DOM fixture JSON the step replays against
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// Page URL recorded into the execution context
    #[arg(long)]
    pub page_url: Option<String>,
}

pub async fn cmd_step(args: StepArgs, ctx: &CliContext, output: OutputFormat) -> AppResult<()> {
    let content = std::fs::read_to_string(&args.step).map_err(|err| AppError::Io {
        path: args.step.display().to_string(),
        reason: err.to_string(),
    })?;
    let step: Step = serde_json::from_str(&content).map_err(|err| AppError::Parse {
        kind: "step",
        path: args.step.display().to_string(),
        reason: err.to_string(),
    })?;
    step.validate()
        .map_err(|err| AppError::InvalidFixture(step.id.clone(), err.to_string()))?;

    let dom = std::sync::Arc::new(fixture::load_fixture(&args.fixture)?);
    let app = AppContext::build(&ctx.config().replay, dom.clone());

    let context = step_executor::StepExecutionContext {
        target_document: dom.root_document(),
        page_url: args.page_url.clone(),
        ..Default::default()
    };

    let result = app.engine.execute(&step, &context, &app.session_options.engine_options.step_executor_options).await?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result).expect("StepExecutionResult always serializes"));
        }
        OutputFormat::Human => {
            println!(
                "{}: {:?} ({}ms, strategy={:?}, confidence={:?})",
                result.step_id, result.status, result.duration_ms, result.locator_strategy, result.locator_confidence
            );
            if let Some(error) = &result.error {
                println!("  error: {error}");
            }
        }
    }

    Ok(())
}
