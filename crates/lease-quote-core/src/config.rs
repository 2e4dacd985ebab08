//! Pricing assumptions shared by both engines.
//!
//! Defaults reproduce the published rate sheet; hosts may override any
//! field from a JSON or YAML file.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LeaseQuoteError;
use crate::types::Rate;
use crate::LeaseQuoteResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub replica: ReplicaAssumptions,
    pub tabulated: TabulatedAssumptions,
}

/// Constants of the formula-replica spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaAssumptions {
    /// Divisor that strips VAT from the sticker price
    pub vat_divisor: Decimal,
    pub acquisition_tax_rate: Rate,
    /// Registration tax for standard and hybrid vehicles
    pub registration_tax_rate: Rate,
    pub electric_registration_tax_rate: Rate,
    /// Annual financing rate, spread evenly over twelve months
    pub annual_financing_rate: Rate,
    /// Monthly insurance-and-tax surcharge on rentals, as a fraction of price
    pub rental_surcharge_rate: Rate,
}

impl Default for ReplicaAssumptions {
    fn default() -> Self {
        Self {
            vat_divisor: dec!(1.1),
            acquisition_tax_rate: dec!(0.02),
            registration_tax_rate: dec!(0.05),
            electric_registration_tax_rate: dec!(0.02),
            annual_financing_rate: dec!(0.06),
            rental_surcharge_rate: dec!(0.005),
        }
    }
}

impl ReplicaAssumptions {
    pub fn monthly_financing_rate(&self) -> Rate {
        self.annual_financing_rate / dec!(12)
    }
}

/// Constants of the tabulated-rate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulatedAssumptions {
    /// Deposit percentage the discount rates below were calibrated at
    pub reference_deposit_rate: Decimal,
    /// Payment discount for a deposit at the reference percentage
    pub deposit_discount_at_reference: Rate,
    /// Payment discount for an advance at the reference percentage
    pub advance_discount_at_reference: Rate,
    /// Share of the nominal dealer fee that reaches the monthly payment
    pub dealer_fee_damping: Rate,
    /// Conditions averaged from fewer samples are flagged as low confidence
    pub min_sample_count: u32,
}

impl Default for TabulatedAssumptions {
    fn default() -> Self {
        Self {
            reference_deposit_rate: dec!(30),
            deposit_discount_at_reference: dec!(0.07),
            advance_discount_at_reference: dec!(0.18),
            dealer_fee_damping: dec!(0.05),
            min_sample_count: 3,
        }
    }
}

impl PricingConfig {
    pub fn from_json_str(json: &str) -> LeaseQuoteResult<Self> {
        let config: PricingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LeaseQuoteResult<()> {
        if self.replica.vat_divisor <= Decimal::ZERO {
            return Err(LeaseQuoteError::InvalidInput {
                field: "replica.vat_divisor".into(),
                reason: "VAT divisor must be positive".into(),
            });
        }
        if self.tabulated.reference_deposit_rate <= Decimal::ZERO {
            return Err(LeaseQuoteError::InvalidInput {
                field: "tabulated.reference_deposit_rate".into(),
                reason: "Reference deposit rate must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.replica.monthly_financing_rate(), dec!(0.005));
        assert_eq!(config.tabulated.reference_deposit_rate, dec!(30));
    }

    #[test]
    fn test_partial_override() {
        let config =
            PricingConfig::from_json_str(r#"{"replica": {"annual_financing_rate": "0.048"}}"#)
                .unwrap();
        assert_eq!(config.replica.annual_financing_rate, dec!(0.048));
        assert_eq!(config.replica.acquisition_tax_rate, dec!(0.02));
        assert_eq!(config.tabulated, TabulatedAssumptions::default());
    }

    #[test]
    fn test_zero_vat_divisor_rejected() {
        let result = PricingConfig::from_json_str(r#"{"replica": {"vat_divisor": "0"}}"#);
        assert!(result.is_err());
    }
}
