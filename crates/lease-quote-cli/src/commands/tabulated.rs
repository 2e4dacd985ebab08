use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use lease_quote_core::tabulated;
use lease_quote_core::{ContractTerms, ProductType};

use crate::commands::terms::{parse_product, TermsArgs};
use crate::input::{self, DataPaths};

/// Arguments for a single-company tabulated quote
#[derive(Args)]
pub struct TabulatedArgs {
    /// Financial company name as it appears in the rate parameters
    #[arg(long)]
    pub company: Option<String>,

    /// lease or rent
    #[arg(long, default_value = "lease")]
    pub product: String,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct TabulatedRequest {
    #[serde(default)]
    product: ProductType,
    company: String,
    terms: ContractTerms,
}

pub fn run_tabulated_quote(
    args: TabulatedArgs,
    paths: &DataPaths,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: TabulatedRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        TabulatedRequest {
            product: parse_product(&args.product)?,
            company: args
                .company
                .ok_or("--company is required (or provide --input)")?,
            terms: args.terms.into_terms()?,
        }
    };

    let store = paths.load_store()?;
    let config = paths.load_config()?;
    let result = tabulated::compute_tabulated_quote(
        &store,
        request.product,
        &request.company,
        &request.terms,
        &config,
    )?;
    Ok(serde_json::to_value(result)?)
}
