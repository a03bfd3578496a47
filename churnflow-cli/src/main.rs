//! Command-line entry point for the churn pipeline.
//!
//! Runs the whole stage sequence exactly once; there is no partial-run or
//! per-stage surface. The process exits non-zero if any stage failed, while
//! best-effort versioning failures only affect the log output.

use anyhow::Result;
use churnflow::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "churnflow",
    version,
    about = "Run the customer-churn data pipeline end to end"
)]
struct Cli {
    /// Path to a JSON pipeline configuration file. Defaults apply when
    /// omitted, and for any field the file leaves out.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    let driver = PipelineDriver::from_config(&config)?;
    let result = driver.run().await;

    for stage in &result.results {
        match &stage.versioning {
            Some(outcome) => {
                info!(stage = %stage.name, status = %stage.status, versioning = %outcome, "stage summary");
            }
            None => {
                info!(stage = %stage.name, status = %stage.status, "stage summary");
            }
        }
    }

    if result.success {
        info!(
            pipeline = %result.pipeline,
            run_id = %result.run_id,
            stages = result.completed_count(),
            "pipeline completed"
        );
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            pipeline = %result.pipeline,
            run_id = %result.run_id,
            error = result.error.as_deref().unwrap_or("unknown"),
            "pipeline failed"
        );
        Ok(ExitCode::FAILURE)
    }
}
