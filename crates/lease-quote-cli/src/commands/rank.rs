use clap::Args;
use serde_json::Value;

use lease_quote_core::ranking::{self, RankingInput};

use crate::commands::terms::{parse_product, TermsArgs};
use crate::input::{self, DataPaths};

/// Arguments for ranking every company
#[derive(Args)]
pub struct RankArgs {
    /// lease or rent
    #[arg(long, default_value = "lease")]
    pub product: String,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Also price the replicated institution (needs --grade and --provider)
    #[arg(long)]
    pub with_replica: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rank(args: RankArgs, paths: &DataPaths) -> Result<Value, Box<dyn std::error::Error>> {
    let ranking_input: RankingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        RankingInput {
            product: parse_product(&args.product)?,
            terms: args.terms.into_terms()?,
            include_replica: args.with_replica,
        }
    };

    let store = paths.load_store()?;
    let config = paths.load_config()?;
    let result = ranking::rank_companies(&store, &ranking_input, &config)?;
    Ok(serde_json::to_value(result)?)
}
