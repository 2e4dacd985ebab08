use clap::Args;
use serde_json::{json, Value};

use crate::commands::terms::parse_product;
use crate::input::DataPaths;

/// Arguments for the company listing
#[derive(Args)]
pub struct CompaniesArgs {
    /// lease or rent
    #[arg(long, default_value = "lease")]
    pub product: String,
}

/// Arguments for a company's condition listing
#[derive(Args)]
pub struct ConditionsArgs {
    /// Financial company name
    #[arg(long)]
    pub company: String,

    /// lease or rent
    #[arg(long, default_value = "lease")]
    pub product: String,

    /// Only conditions for this period
    #[arg(long)]
    pub period: Option<u32>,
}

pub fn run_companies(
    args: CompaniesArgs,
    paths: &DataPaths,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product = parse_product(&args.product)?;
    let store = paths.load_store()?;
    let periods = store.rates().periods(product);
    let mileages: Vec<Value> = periods
        .iter()
        .map(|p| json!({ "period": p, "mileages": store.rates().mileages(product, *p) }))
        .collect();

    Ok(json!({
        "result": {
            "product": product,
            "companies": store.companies(product),
            "periods": mileages,
            "residual_providers": store.residual().providers(),
        }
    }))
}

pub fn run_conditions(
    args: ConditionsArgs,
    paths: &DataPaths,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product = parse_product(&args.product)?;
    let store = paths.load_store()?;
    let conditions = store
        .rates()
        .conditions(product, &args.company)
        .ok_or_else(|| format!("No {product} parameters for '{}'", args.company))?;

    let rows: Vec<Value> = conditions
        .iter()
        .filter(|(_, c)| args.period.map_or(true, |p| c.period == p))
        .map(|(key, c)| {
            let mut row = serde_json::to_value(c).unwrap_or_default();
            if let Value::Object(map) = &mut row {
                map.insert("condition".to_string(), Value::String(key.clone()));
            }
            row
        })
        .collect();

    Ok(json!({
        "result": {
            "company": args.company,
            "product": product,
            "conditions": rows,
        }
    }))
}
