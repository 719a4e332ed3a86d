use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use core_types::Step;
use dom_traversal::DomPort;
use tracing::info;

use super::context::CliContext;
use super::output::OutputFormat;
use crate::app_context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::fixture;

#[derive(Args, Clone, Debug)]
pub struct ReplayArgs {
    /// JSON file holding a `Step[]` array (§3)
    #[arg(long, value_name = "FILE")]
    pub steps: PathBuf,

    /// DOM fixture JSON the steps replay against
    #[arg(long, value_name = "FILE")]
    pub fixture: PathBuf,

    /// CSV file of data rows driving the session (§4.6); omit for a
    /// single run with no CSV values
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// JSON object mapping CSV column name -> step label (§4.6)
    #[arg(long, value_name = "FILE")]
    pub field_mappings: Option<PathBuf>,

    /// Page URL recorded into the execution context
    #[arg(long)]
    pub page_url: Option<String>,
}

fn load_steps(path: &std::path::Path) -> AppResult<Vec<Step>> {
    let content = std::fs::read_to_string(path).map_err(|err| AppError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let steps: Vec<Step> = serde_json::from_str(&content).map_err(|err| AppError::Parse {
        kind: "steps",
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    for step in &steps {
        step.validate()
            .map_err(|err| AppError::InvalidFixture(step.id.clone(), err.to_string()))?;
    }
    Ok(steps)
}

fn load_field_mappings(path: Option<&std::path::Path>) -> AppResult<HashMap<String, String>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(path).map_err(|err| AppError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|err| AppError::Parse {
        kind: "field mappings",
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn load_rows(path: Option<&std::path::Path>) -> AppResult<Vec<HashMap<String, String>>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let mut reader = csv::Reader::from_path(path).map_err(|err| AppError::Parse {
        kind: "CSV",
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let headers = reader
        .headers()
        .map_err(|err| AppError::Parse {
            kind: "CSV headers",
            path: path.display().to_string(),
            reason: err.to_string(),
        })?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| AppError::Parse {
            kind: "CSV row",
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

pub async fn cmd_replay(args: ReplayArgs, ctx: &CliContext, output: OutputFormat) -> AppResult<()> {
    let steps = load_steps(&args.steps)?;
    let dom = std::sync::Arc::new(fixture::load_fixture(&args.fixture)?);
    let rows = load_rows(args.csv.as_deref())?;
    let field_mappings = load_field_mappings(args.field_mappings.as_deref())?;

    let app = AppContext::build(&ctx.config().replay, dom.clone());

    let base_context = step_executor::StepExecutionContext {
        target_document: dom.root_document(),
        page_url: args.page_url.clone(),
        ..Default::default()
    };

    info!(steps = steps.len(), rows = rows.len(), "starting replay session");
    let summary = app
        .session
        .start(&steps, &rows, &field_mappings, &base_context, &app.session_options)
        .await?;
    let _ = app.session.reset();

    let success = summary.success();
    match output {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&summary).expect("SessionSummary always serializes");
            if let serde_json::Value::Object(map) = &mut value {
                map.insert("success".to_string(), serde_json::Value::Bool(success));
            }
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
        OutputFormat::Human => {
            println!("rows: {} (success: {success})", summary.total_rows);
            for row in &summary.row_results {
                println!(
                    "  row {}: skipped={} success={} passed={} failed={} duration_ms={}",
                    row.row_index, row.skipped, row.success, row.passed, row.failed, row.duration_ms
                );
                if let Some(error) = &row.error {
                    println!("    error: {error}");
                }
            }
        }
    }

    Ok(())
}
