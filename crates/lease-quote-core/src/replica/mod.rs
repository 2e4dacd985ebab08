//! Formula-replica engine: reproduces a single institution's quotation
//! spreadsheet from first principles (taxes, residual value, depreciation,
//! financing on the average balance).

pub mod lease;
pub mod rental;
pub mod residual;
pub mod tax;

use std::time::Instant;

use rust_decimal::Decimal;

use crate::config::PricingConfig;
use crate::store::ParameterStore;
use crate::types::{
    with_metadata, ComputationOutput, ContractTerms, ProductType, QuoteDetails, QuoteResult,
    ResidualSource,
};
use crate::LeaseQuoteResult;

pub use lease::replica_lease_quote;
pub use rental::replica_rental_quote;
pub use residual::{lookup_residual_rate, ResidualLookup, DEFAULT_RESIDUAL_RATE};
pub use tax::{acquisition_taxes, AcquisitionTaxes};

/// Institution whose spreadsheet the engine replicates.
pub const REPLICA_INSTITUTION: &str = "BNK Capital";

/// Price `terms` with the replica engine and wrap the quote in the standard
/// output envelope.
pub fn compute_replica_quote(
    store: &ParameterStore,
    product: ProductType,
    terms: &ContractTerms,
    config: &PricingConfig,
) -> LeaseQuoteResult<ComputationOutput<QuoteResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let quote = match product {
        ProductType::Lease => replica_lease_quote(store, terms, &config.replica)?,
        ProductType::Rent => replica_rental_quote(store, terms, &config.replica)?,
    };

    if let QuoteDetails::Replica(d) = &quote.details {
        let provider = terms.residual_provider.as_deref().unwrap_or_default();
        match d.residual_source {
            ResidualSource::Table => {}
            ResidualSource::MissingProvider => warnings.push(format!(
                "No residual table for provider '{provider}'; default residual rate {} used",
                DEFAULT_RESIDUAL_RATE
            )),
            ResidualSource::MissingPeriod => warnings.push(format!(
                "Residual table for '{provider}' does not cover {} months; default residual rate {} used",
                terms.period_months, DEFAULT_RESIDUAL_RATE
            )),
            ResidualSource::MissingGrade => warnings.push(format!(
                "Residual table for '{provider}' has no grade '{}'; default residual rate {} used",
                terms.grade.as_deref().unwrap_or_default(),
                DEFAULT_RESIDUAL_RATE
            )),
        }
        if d.residual_rate < Decimal::ZERO || d.residual_rate > Decimal::ONE {
            warnings.push(format!(
                "Mileage-adjusted residual rate {} lies outside [0, 1]",
                d.residual_rate
            ));
        }
    }
    if terms.dealer_discount > Decimal::ZERO {
        warnings.push(
            "Dealer discount is amortized into the payment only; acquisition cost and residual value use the undiscounted price"
                .to_string(),
        );
    }
    if quote.monthly_payment <= Decimal::ZERO {
        warnings.push(format!(
            "Non-positive monthly payment {}; check discounts against the vehicle price",
            quote.monthly_payment
        ));
    }

    let methodology = format!("{REPLICA_INSTITUTION} {product} spreadsheet replica");
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        &methodology,
        &config.replica,
        warnings,
        elapsed,
        quote,
    ))
}
