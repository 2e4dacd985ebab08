//! Per-company rate parameters averaged from historical quote samples.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Months, ProductType, Rate};

/// Averaged pricing parameters for one (company, period, mileage) condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionParameters {
    pub period: Months,
    pub mileage: String,
    /// Monthly payment as a percentage of vehicle price
    pub base_rate: Decimal,
    #[serde(default)]
    pub base_rate_std: Decimal,
    /// Monthly payment change per currency unit of option price
    pub option_coefficient: Decimal,
    pub residual_rate: Rate,
    #[serde(default)]
    pub residual_rate_std: Decimal,
    /// Number of quotes averaged into this condition
    #[serde(default)]
    pub sample_count: u32,
}

/// Condition key -> parameters, sorted by key.
pub type CompanyConditions = BTreeMap<String, ConditionParameters>;

/// Company name -> conditions.
pub type ProductCompanies = BTreeMap<String, CompanyConditions>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyRateParameters {
    #[serde(default)]
    pub lease: ProductCompanies,
    #[serde(default)]
    pub rent: ProductCompanies,
    /// Provenance of the extraction run; never read by pricing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// `"{period}_{mileage}"`
pub fn condition_key(period: Months, mileage: &str) -> String {
    format!("{period}_{mileage}")
}

impl CompanyRateParameters {
    pub fn product(&self, product: ProductType) -> &ProductCompanies {
        match product {
            ProductType::Lease => &self.lease,
            ProductType::Rent => &self.rent,
        }
    }

    pub fn product_mut(&mut self, product: ProductType) -> &mut ProductCompanies {
        match product {
            ProductType::Lease => &mut self.lease,
            ProductType::Rent => &mut self.rent,
        }
    }

    pub fn companies(&self, product: ProductType) -> Vec<&str> {
        self.product(product).keys().map(String::as_str).collect()
    }

    pub fn conditions(&self, product: ProductType, company: &str) -> Option<&CompanyConditions> {
        self.product(product).get(company)
    }

    /// Every contract period offered by at least one company, ascending.
    pub fn periods(&self, product: ProductType) -> Vec<Months> {
        let mut periods: Vec<Months> = self
            .product(product)
            .values()
            .flat_map(|conditions| conditions.values().map(|c| c.period))
            .collect();
        periods.sort_unstable();
        periods.dedup();
        periods
    }

    /// Mileage bands offered for one period, sorted.
    pub fn mileages(&self, product: ProductType, period: Months) -> Vec<&str> {
        let mut mileages: Vec<&str> = self
            .product(product)
            .values()
            .flat_map(|conditions| conditions.values())
            .filter(|c| c.period == period)
            .map(|c| c.mileage.as_str())
            .collect();
        mileages.sort_unstable();
        mileages.dedup();
        mileages
    }
}
