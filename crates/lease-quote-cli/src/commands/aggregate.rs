use clap::Args;
use serde_json::Value;
use std::fs;

use lease_quote_core::store::aggregate::{aggregate_samples, QuoteSample};

use crate::input;

/// Arguments for building rate parameters from quote samples
#[derive(Args)]
pub struct AggregateArgs {
    /// Path to a JSON array of quote samples
    #[arg(long)]
    pub input: Option<String>,

    /// Also write the rate parameters file to this path
    #[arg(long)]
    pub write: Option<String>,
}

pub fn run_aggregate(args: AggregateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let samples: Vec<QuoteSample> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        return Err("--input file is required for aggregation".into());
    };

    let output = aggregate_samples(&samples)?;
    if let Some(ref path) = args.write {
        fs::write(path, serde_json::to_string_pretty(&output.parameters)?)
            .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
        log::info!("rate parameters written to {path}");
    }

    Ok(serde_json::json!({
        "result": {
            "samples_used": output.samples_used,
            "samples_skipped": output.samples_skipped,
            "parameters": output.parameters,
        }
    }))
}
