use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use lease_quote_core::replica;
use lease_quote_core::{ContractTerms, ProductType};

use crate::commands::terms::{parse_product, TermsArgs};
use crate::input::{self, DataPaths};

/// Arguments for a formula-replica quote
#[derive(Args)]
pub struct QuoteArgs {
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
struct QuoteRequest {
    #[serde(default)]
    product: ProductType,
    terms: ContractTerms,
}

pub fn run_quote(args: QuoteArgs, paths: &DataPaths) -> Result<Value, Box<dyn std::error::Error>> {
    let request: QuoteRequest = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        QuoteRequest {
            product: parse_product(&args.product)?,
            terms: args.terms.into_terms()?,
        }
    };

    let store = paths.load_store()?;
    let config = paths.load_config()?;
    let result = replica::compute_replica_quote(&store, request.product, &request.terms, &config)?;
    Ok(serde_json::to_value(result)?)
}
