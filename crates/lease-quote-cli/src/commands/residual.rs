use clap::Args;
use serde_json::{json, Value};

use lease_quote_core::replica::lookup_residual_rate;

use crate::input::DataPaths;

/// Arguments for a residual-rate lookup
#[derive(Args)]
pub struct ResidualArgs {
    /// Residual-value provider
    #[arg(long)]
    pub provider: String,

    /// Contract period in months
    #[arg(long)]
    pub period: u32,

    /// Grade letter; omit to list the grades available
    #[arg(long)]
    pub grade: Option<String>,

    /// Annual mileage band
    #[arg(long, default_value = "20k")]
    pub mileage: String,
}

pub fn run_residual_rate(
    args: ResidualArgs,
    paths: &DataPaths,
) -> Result<Value, Box<dyn std::error::Error>> {
    let store = paths.load_store()?;
    let tables = store.residual();

    let Some(grade) = args.grade else {
        let grades = tables.grades(&args.provider, &args.mileage, args.period);
        return Ok(json!({
            "result": {
                "provider": args.provider,
                "period": args.period,
                "mileage": args.mileage,
                "grades": grades,
            }
        }));
    };

    let lookup = lookup_residual_rate(tables, &args.provider, args.period, &grade, &args.mileage);
    let mut warnings = Vec::new();
    if lookup.is_default() {
        warnings.push(format!(
            "No table rate for {} / {} months / grade {}; default applied",
            args.provider, args.period, grade
        ));
    }
    Ok(json!({
        "result": lookup,
        "warnings": warnings,
    }))
}
