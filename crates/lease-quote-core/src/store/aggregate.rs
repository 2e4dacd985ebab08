//! Derive company rate parameters from raw quote samples.
//!
//! Each sample is one published quote for one vehicle: the monthly payment
//! without options and with a fixed option package. Samples are grouped by
//! (product, company, period, mileage) and averaged.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::store::rate_params::{condition_key, CompanyRateParameters, ConditionParameters};
use crate::types::{Money, Months, ProductType};
use crate::LeaseQuoteResult;

/// Option package price the "with option" quotes were taken at.
const OPTION_PRICE_STEP: Decimal = dec!(5000000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSample {
    pub product: ProductType,
    pub company: String,
    pub period: Months,
    pub mileage: String,
    pub vehicle_price: Money,
    /// Monthly payment with no options
    pub monthly_no_option: Money,
    /// Monthly payment with the reference option package
    pub monthly_with_option: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationOutput {
    pub parameters: CompanyRateParameters,
    pub samples_used: usize,
    pub samples_skipped: usize,
}

struct DerivedSample {
    base_rate: Decimal,
    option_coefficient: Decimal,
    residual_rate: Decimal,
}

type GroupKey = (ProductType, String, Months, String);

/// Average raw samples into the company-rate-parameters format.
pub fn aggregate_samples(samples: &[QuoteSample]) -> LeaseQuoteResult<AggregationOutput> {
    if samples.is_empty() {
        return Err(LeaseQuoteError::InvalidInput {
            field: "samples".into(),
            reason: "At least one quote sample is required".into(),
        });
    }

    let mut groups: BTreeMap<GroupKey, Vec<DerivedSample>> = BTreeMap::new();
    let mut skipped = 0usize;

    for sample in samples {
        if sample.vehicle_price <= Decimal::ZERO || sample.period == 0 {
            log::warn!(
                "skipping sample for {} ({} months): non-positive price or period",
                sample.company,
                sample.period
            );
            skipped += 1;
            continue;
        }
        let derived = derive(sample);
        groups
            .entry((
                sample.product,
                sample.company.clone(),
                sample.period,
                sample.mileage.clone(),
            ))
            .or_default()
            .push(derived);
    }

    let mut parameters = CompanyRateParameters::default();
    for ((product, company, period, mileage), derived) in &groups {
        let base_rates: Vec<Decimal> = derived.iter().map(|d| d.base_rate).collect();
        let option_coeffs: Vec<Decimal> = derived.iter().map(|d| d.option_coefficient).collect();
        let residual_rates: Vec<Decimal> = derived.iter().map(|d| d.residual_rate).collect();

        let condition = ConditionParameters {
            period: *period,
            mileage: mileage.clone(),
            base_rate: mean(&base_rates),
            base_rate_std: population_std(&base_rates),
            option_coefficient: mean(&option_coeffs),
            residual_rate: mean(&residual_rates),
            residual_rate_std: population_std(&residual_rates),
            sample_count: derived.len() as u32,
        };
        parameters
            .product_mut(*product)
            .entry(company.clone())
            .or_default()
            .insert(condition_key(*period, mileage), condition);
    }

    parameters.metadata = Some(serde_json::json!({
        "version": "1.0",
        "description": "Averaged from published quote samples",
        "generated_on": chrono::Local::now().date_naive().to_string(),
    }));

    Ok(AggregationOutput {
        parameters,
        samples_used: samples.len() - skipped,
        samples_skipped: skipped,
    })
}

fn derive(sample: &QuoteSample) -> DerivedSample {
    let base_rate = sample.monthly_no_option / sample.vehicle_price * dec!(100);
    let option_coefficient =
        (sample.monthly_with_option - sample.monthly_no_option) / OPTION_PRICE_STEP;
    // Straight-line estimate: whatever the payments do not repay is residual.
    let paid = sample.monthly_no_option * Decimal::from(sample.period) / sample.vehicle_price;
    let residual_rate = (Decimal::ONE - paid).max(Decimal::ZERO).min(Decimal::ONE);
    DerivedSample {
        base_rate,
        option_coefficient,
        residual_rate,
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

fn population_std(values: &[Decimal]) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (*v - m) * (*v - m)).sum::<Decimal>()
        / Decimal::from(values.len());
    variance.sqrt().unwrap_or(Decimal::ZERO)
}
