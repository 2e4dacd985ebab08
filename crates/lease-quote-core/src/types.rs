use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::LeaseQuoteResult;

/// All monetary values (KRW). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless a field says otherwise.
pub type Rate = Decimal;

/// Contract length in months
pub type Months = u32;

/// Mileage band every residual table and condition is priced against.
pub const BASELINE_MILEAGE: &str = "20k";

/// Largest price, option price or discount accepted (one trillion KRW).
/// Keeps every intermediate product well inside `Decimal` range.
pub const MAX_CONTRACT_AMOUNT: Money = dec!(1_000_000_000_000);

/// Financial product being quoted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Lease,
    #[serde(alias = "rental")]
    Rent,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Lease => write!(f, "lease"),
            ProductType::Rent => write!(f, "rental"),
        }
    }
}

/// Upfront payment mechanism
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositType {
    /// No deposit, no advance
    #[default]
    None,
    /// Refundable deposit that offsets financing interest
    Deposit,
    /// Prepaid principal amortized over the term
    Advance,
}

impl fmt::Display for DepositType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepositType::None => write!(f, "no deposit"),
            DepositType::Deposit => write!(f, "deposit"),
            DepositType::Advance => write!(f, "advance"),
        }
    }
}

/// Powertrain class, drives the registration tax rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcoType {
    #[default]
    Standard,
    Hybrid,
    Electric,
}

// ---------------------------------------------------------------------------
// Contract terms
// ---------------------------------------------------------------------------

fn default_mileage() -> String {
    BASELINE_MILEAGE.to_string()
}

fn default_dealer_fee_rate() -> Decimal {
    dec!(1)
}

fn default_domestic() -> bool {
    true
}

/// Everything a quote depends on, as collected from the customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTerms {
    /// VAT-inclusive vehicle price
    pub vehicle_price: Money,
    /// Factory option price added on top of the vehicle price
    #[serde(default)]
    pub option_price: Money,
    /// Contract period in months
    pub period_months: Months,
    /// Annual mileage band label (e.g. "10k", "20k", "30k")
    #[serde(default = "default_mileage")]
    pub mileage: String,
    #[serde(default)]
    pub deposit_type: DepositType,
    /// Deposit/advance as a percentage of the price (0, 10, 20, 30)
    #[serde(default)]
    pub deposit_rate: Decimal,
    /// Dealer discount in currency units
    #[serde(default)]
    pub dealer_discount: Money,
    /// Dealer fee as a percentage (1.0 = 1%)
    #[serde(default = "default_dealer_fee_rate")]
    pub dealer_fee_rate: Decimal,
    #[serde(default)]
    pub eco_type: EcoType,
    /// Domestic vehicles use the acquisition cost as residual base
    #[serde(default = "default_domestic")]
    pub domestic: bool,
    /// Residual-value grade letter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    /// Residual-value provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_provider: Option<String>,
}

impl ContractTerms {
    pub fn new(vehicle_price: Money, period_months: Months) -> Self {
        Self {
            vehicle_price,
            option_price: Decimal::ZERO,
            period_months,
            mileage: default_mileage(),
            deposit_type: DepositType::None,
            deposit_rate: Decimal::ZERO,
            dealer_discount: Decimal::ZERO,
            dealer_fee_rate: default_dealer_fee_rate(),
            eco_type: EcoType::Standard,
            domestic: true,
            grade: None,
            residual_provider: None,
        }
    }

    /// Deposit rate that actually applies: zero when no deposit type is chosen.
    pub fn effective_deposit_rate(&self) -> Decimal {
        match self.deposit_type {
            DepositType::None => Decimal::ZERO,
            DepositType::Deposit | DepositType::Advance => self.deposit_rate,
        }
    }

    /// Reject terms that would make the formulas divide by zero or go negative.
    pub fn validate(&self) -> LeaseQuoteResult<()> {
        if self.period_months == 0 {
            return Err(LeaseQuoteError::InvalidInput {
                field: "period_months".into(),
                reason: "Contract period must be greater than zero".into(),
            });
        }
        check_amount("vehicle_price", "Vehicle price", self.vehicle_price)?;
        check_amount("option_price", "Option price", self.option_price)?;
        check_amount("dealer_discount", "Dealer discount", self.dealer_discount)?;
        if self.deposit_rate < Decimal::ZERO || self.deposit_rate > dec!(100) {
            return Err(LeaseQuoteError::InvalidInput {
                field: "deposit_rate".into(),
                reason: "Deposit rate must be a percentage between 0 and 100".into(),
            });
        }
        if self.dealer_fee_rate < Decimal::ZERO || self.dealer_fee_rate > dec!(100) {
            return Err(LeaseQuoteError::InvalidInput {
                field: "dealer_fee_rate".into(),
                reason: "Dealer fee rate must be a percentage between 0 and 100".into(),
            });
        }
        Ok(())
    }
}

fn check_amount(field: &str, label: &str, amount: Money) -> LeaseQuoteResult<()> {
    if amount < Decimal::ZERO {
        return Err(LeaseQuoteError::InvalidInput {
            field: field.into(),
            reason: format!("{label} cannot be negative"),
        });
    }
    if amount > MAX_CONTRACT_AMOUNT {
        return Err(LeaseQuoteError::InvalidInput {
            field: field.into(),
            reason: format!("{label} exceeds {MAX_CONTRACT_AMOUNT}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Quote results
// ---------------------------------------------------------------------------

/// One priced quote for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Financial company (or replicated institution) name
    pub company: String,
    pub product: ProductType,
    /// Payment category: no deposit, deposit or advance
    pub payment_type: DepositType,
    /// Monthly payment, rounded to the currency unit
    pub monthly_payment: Money,
    /// Human-readable computation steps, in calculation order
    pub trace: Vec<String>,
    pub details: QuoteDetails,
}

/// Engine-specific intermediate values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum QuoteDetails {
    Replica(ReplicaDetails),
    Tabulated(TabulatedDetails),
}

/// How a residual rate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualSource {
    /// Found in the provider's table
    Table,
    /// Provider table exists but the period is not covered
    MissingPeriod,
    /// Period covered but the grade is not listed
    MissingGrade,
    /// No table for the provider at all
    MissingProvider,
}

/// Intermediate values of a formula-replica quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaDetails {
    pub vehicle_price: Money,
    pub option_price: Money,
    pub base_price: Money,
    pub supply_price: Money,
    pub acquisition_tax: Money,
    pub registration_tax: Money,
    pub acquisition_cost: Money,
    /// Amount the residual rate is applied to
    pub residual_base: Money,
    pub residual_rate: Rate,
    pub residual_value: Money,
    /// Residual table key actually used, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual_table: Option<String>,
    pub residual_source: ResidualSource,
    pub mileage_adjustment: Rate,
    pub monthly_depreciation: Money,
    pub monthly_financing_cost: Money,
    pub base_monthly_payment: Money,
    pub deposit_discount: Money,
    pub dealer_discount_reduction: Money,
    /// Monthly insurance-and-tax surcharge (rental only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_surcharge: Option<Money>,
}

/// Which stored condition answered a tabulated lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMatch {
    Exact,
    SamePeriod,
    AnyCondition,
}

/// Intermediate values of a tabulated-rate quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedDetails {
    pub requested_condition: String,
    pub resolved_condition: String,
    pub condition_match: ConditionMatch,
    /// Percent of vehicle price per month
    pub base_rate: Decimal,
    pub option_coefficient: Decimal,
    pub residual_rate: Rate,
    pub sample_count: u32,
    pub base_monthly: Money,
    pub option_addition: Money,
    pub deposit_discount_rate: Rate,
    pub deposit_discount: Money,
    pub dealer_fee_addition: Money,
}

/// Round to the nearest currency unit, half to even.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
