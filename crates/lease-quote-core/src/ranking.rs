//! Price every known company for one set of terms and order them cheapest
//! first.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::replica::{replica_lease_quote, replica_rental_quote, REPLICA_INSTITUTION};
use crate::store::ParameterStore;
use crate::tabulated::{quote::tabulated_quote, quote_warnings};
use crate::types::{with_metadata, ComputationOutput, ContractTerms, ProductType, QuoteResult};
use crate::LeaseQuoteResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingInput {
    #[serde(default)]
    pub product: ProductType,
    pub terms: ContractTerms,
    /// Also price the replicated institution (needs grade and provider)
    #[serde(default)]
    pub include_replica: bool,
}

/// A company that could not be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFailure {
    pub company: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    /// Ascending by monthly payment; ties keep company-name order
    pub quotes: Vec<QuoteResult>,
    pub failures: Vec<CompanyFailure>,
}

impl Ranking {
    pub fn cheapest(&self) -> Option<&QuoteResult> {
        self.quotes.first()
    }
}

/// Rank all companies for `input.product`. A failing company is recorded
/// and skipped; it never aborts the pass.
pub fn rank_companies(
    store: &ParameterStore,
    input: &RankingInput,
    config: &PricingConfig,
) -> LeaseQuoteResult<ComputationOutput<Ranking>> {
    let start = Instant::now();
    input.terms.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let mut quotes: Vec<QuoteResult> = Vec::new();
    let mut failures: Vec<CompanyFailure> = Vec::new();

    for company in store.companies(input.product) {
        match tabulated_quote(store, input.product, company, &input.terms, &config.tabulated) {
            Ok(quote) => {
                warnings.extend(quote_warnings(&quote, config.tabulated.min_sample_count));
                quotes.push(quote);
            }
            Err(e) => {
                log::warn!("skipping {company} in ranking: {e}");
                failures.push(CompanyFailure {
                    company: company.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    if input.include_replica {
        let replica = match input.product {
            ProductType::Lease => replica_lease_quote(store, &input.terms, &config.replica),
            ProductType::Rent => replica_rental_quote(store, &input.terms, &config.replica),
        };
        match replica {
            Ok(quote) => quotes.push(quote),
            Err(e) => failures.push(CompanyFailure {
                company: REPLICA_INSTITUTION.to_string(),
                message: e.to_string(),
            }),
        }
    }

    quotes.retain(|q| {
        let keep = q.monthly_payment > Decimal::ZERO;
        if !keep {
            warnings.push(format!(
                "{}: non-positive payment {} discarded",
                q.company, q.monthly_payment
            ));
        }
        keep
    });
    quotes.sort_by(|a, b| a.monthly_payment.cmp(&b.monthly_payment));

    for failure in &failures {
        warnings.push(format!("{}: {}", failure.company, failure.message));
    }

    log::debug!(
        "ranked {} {} quotes, {} failures",
        quotes.len(),
        input.product,
        failures.len()
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tabulated rate parameters per company, ranked by monthly payment",
        config,
        warnings,
        elapsed,
        Ranking { quotes, failures },
    ))
}
