//! Tabulated-rate engine: prices any company from rate parameters averaged
//! over its historical quotes.

pub mod quote;
pub mod resolve;

use std::time::Instant;

use crate::config::PricingConfig;
use crate::store::ParameterStore;
use crate::types::{
    with_metadata, ComputationOutput, ConditionMatch, ContractTerms, ProductType, QuoteDetails,
    QuoteResult,
};
use crate::LeaseQuoteResult;

pub use quote::tabulated_quote;
pub use resolve::{resolve_condition, ResolvedCondition};

pub fn compute_tabulated_quote(
    store: &ParameterStore,
    product: ProductType,
    company: &str,
    terms: &ContractTerms,
    config: &PricingConfig,
) -> LeaseQuoteResult<ComputationOutput<QuoteResult>> {
    let start = Instant::now();
    let quote = tabulated_quote(store, product, company, terms, &config.tabulated)?;
    let warnings = quote_warnings(&quote, config.tabulated.min_sample_count);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Tabulated rate parameters averaged from historical quotes",
        &config.tabulated,
        warnings,
        elapsed,
        quote,
    ))
}

/// Fallback and low-confidence notes for one tabulated quote.
pub(crate) fn quote_warnings(quote: &QuoteResult, min_sample_count: u32) -> Vec<String> {
    let mut warnings = Vec::new();
    let QuoteDetails::Tabulated(d) = &quote.details else {
        return warnings;
    };
    match d.condition_match {
        ConditionMatch::Exact => {}
        ConditionMatch::SamePeriod => warnings.push(format!(
            "{}: no parameters for {}, priced with {} (same period, different mileage)",
            quote.company, d.requested_condition, d.resolved_condition
        )),
        ConditionMatch::AnyCondition => warnings.push(format!(
            "{}: no parameters for the requested period, priced with {}",
            quote.company, d.resolved_condition
        )),
    }
    if d.sample_count < min_sample_count {
        warnings.push(format!(
            "{}: condition {} averaged from only {} sample(s)",
            quote.company, d.resolved_condition, d.sample_count
        ));
    }
    warnings
}
