use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use lease_quote_core::replica::acquisition_taxes;
use lease_quote_core::EcoType;

use crate::input::{self, DataPaths};

/// Arguments for the acquisition tax calculation
#[derive(Args)]
pub struct AcquisitionTaxArgs {
    /// VAT-inclusive price (vehicle plus options)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// standard, hybrid or electric
    #[arg(long, default_value = "standard")]
    pub eco_type: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct TaxRequest {
    price: Decimal,
    #[serde(default)]
    eco_type: EcoType,
}

pub fn run_acquisition_tax(
    args: AcquisitionTaxArgs,
    paths: &DataPaths,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: TaxRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        TaxRequest {
            price: args.price.ok_or("--price is required (or provide --input)")?,
            eco_type: serde_json::from_value(Value::String(args.eco_type.to_lowercase()))
                .map_err(|_| format!("--eco-type: unrecognised value '{}'", args.eco_type))?,
        }
    };
    if request.price < Decimal::ZERO {
        return Err("price cannot be negative".into());
    }

    let config = paths.load_config()?;
    let taxes = acquisition_taxes(request.price, request.eco_type, &config.replica);
    Ok(json!({
        "result": {
            "supply_price": taxes.supply_price,
            "acquisition_tax": taxes.acquisition_tax,
            "registration_tax": taxes.registration_tax,
            "registration_tax_rate": taxes.registration_tax_rate,
            "total_tax": taxes.total(),
        },
        "methodology": "Supply price = price / VAT divisor; taxes rounded to tens",
    }))
}
