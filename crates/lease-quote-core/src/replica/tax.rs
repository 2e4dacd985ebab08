//! Acquisition and registration taxes on a VAT-inclusive vehicle price.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::ReplicaAssumptions;
use crate::types::{EcoType, Money, Rate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionTaxes {
    /// Price net of VAT
    pub supply_price: Money,
    pub acquisition_tax: Money,
    pub registration_tax: Money,
    pub registration_tax_rate: Rate,
}

impl AcquisitionTaxes {
    pub fn total(&self) -> Money {
        self.acquisition_tax + self.registration_tax
    }
}

/// Compute both taxes, each rounded to the nearest 10 currency units.
pub fn acquisition_taxes(
    price: Money,
    eco_type: EcoType,
    assumptions: &ReplicaAssumptions,
) -> AcquisitionTaxes {
    let supply_price = price / assumptions.vat_divisor;
    let registration_tax_rate = match eco_type {
        EcoType::Standard | EcoType::Hybrid => assumptions.registration_tax_rate,
        EcoType::Electric => assumptions.electric_registration_tax_rate,
    };
    AcquisitionTaxes {
        supply_price,
        acquisition_tax: round_to_tens(supply_price * assumptions.acquisition_tax_rate),
        registration_tax: round_to_tens(supply_price * registration_tax_rate),
        registration_tax_rate,
    }
}

/// Round at the tens place, half to even.
pub fn round_to_tens(amount: Money) -> Money {
    (amount / dec!(10)).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        * dec!(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vehicle_exact_example() {
        let taxes = acquisition_taxes(
            dec!(110000000),
            EcoType::Standard,
            &ReplicaAssumptions::default(),
        );
        assert_eq!(taxes.supply_price, dec!(100000000));
        assert_eq!(taxes.acquisition_tax, dec!(2000000));
        assert_eq!(taxes.registration_tax, dec!(5000000));
        assert_eq!(taxes.total(), dec!(7000000));
    }

    #[test]
    fn test_hybrid_uses_standard_registration_rate() {
        let a = ReplicaAssumptions::default();
        let standard = acquisition_taxes(dec!(110000000), EcoType::Standard, &a);
        let hybrid = acquisition_taxes(dec!(110000000), EcoType::Hybrid, &a);
        assert_eq!(standard, hybrid);
    }

    #[test]
    fn test_electric_registration_rate() {
        let taxes = acquisition_taxes(
            dec!(110000000),
            EcoType::Electric,
            &ReplicaAssumptions::default(),
        );
        assert_eq!(taxes.acquisition_tax, dec!(2000000));
        assert_eq!(taxes.registration_tax, dec!(2000000));
        assert_eq!(taxes.registration_tax_rate, dec!(0.02));
    }

    #[test]
    fn test_taxes_rounded_to_tens() {
        // supply = 90,909,090.909...; 2% = 1,818,181.82; 5% = 4,545,454.55
        let taxes = acquisition_taxes(
            dec!(100000000),
            EcoType::Standard,
            &ReplicaAssumptions::default(),
        );
        assert_eq!(taxes.acquisition_tax, dec!(1818180));
        assert_eq!(taxes.registration_tax, dec!(4545450));
    }

    #[test]
    fn test_round_to_tens_half_even() {
        assert_eq!(round_to_tens(dec!(1234)), dec!(1230));
        assert_eq!(round_to_tens(dec!(1236)), dec!(1240));
        assert_eq!(round_to_tens(dec!(1225)), dec!(1220));
        assert_eq!(round_to_tens(dec!(1235)), dec!(1240));
    }
}
