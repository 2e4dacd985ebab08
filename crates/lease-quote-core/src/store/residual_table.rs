//! Residual-value tables published by residual-value providers.
//!
//! File layout: every key except the reserved ones is
//! `"{provider}_{mileage}"` mapping period (months, as a string) to grade
//! letter to residual rate. Reserved keys hold the mileage offsets and the
//! month-indexed depreciation curve.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LeaseQuoteError;
use crate::types::{Months, Rate, BASELINE_MILEAGE};

pub const MILEAGE_ADJUSTMENT_KEY: &str = "mileage_adjustment";
pub const DEPRECIATION_CURVE_KEY: &str = "depreciation_curve";

/// Grade letter -> residual rate
pub type GradeRates = BTreeMap<String, Rate>;

/// Contract period -> grade rates
pub type PeriodTable = BTreeMap<Months, GradeRates>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct ResidualValueTables {
    /// Keyed by `"{provider}_{mileage}"`
    pub tables: BTreeMap<String, PeriodTable>,
    /// Mileage band -> additive offset on the baseline rate
    pub mileage_adjustment: BTreeMap<String, Rate>,
    /// Month (0-60) -> cumulative depreciation rate
    pub depreciation_curve: BTreeMap<u32, Rate>,
}

impl TryFrom<BTreeMap<String, Value>> for ResidualValueTables {
    type Error = LeaseQuoteError;

    fn try_from(raw: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut tables = ResidualValueTables::default();
        for (key, value) in raw {
            match key.as_str() {
                MILEAGE_ADJUSTMENT_KEY => {
                    tables.mileage_adjustment = serde_json::from_value(value)?;
                }
                DEPRECIATION_CURVE_KEY => {
                    tables.depreciation_curve = serde_json::from_value(value)?;
                }
                _ => {
                    let table: PeriodTable = serde_json::from_value(value).map_err(|e| {
                        LeaseQuoteError::DataLoad(format!("residual table '{key}': {e}"))
                    })?;
                    tables.tables.insert(key, table);
                }
            }
        }
        Ok(tables)
    }
}

impl ResidualValueTables {
    pub fn table_key(provider: &str, mileage: &str) -> String {
        format!("{provider}_{mileage}")
    }

    pub fn table(&self, key: &str) -> Option<&PeriodTable> {
        self.tables.get(key)
    }

    pub fn mileage_offset(&self, mileage: &str) -> Option<Rate> {
        self.mileage_adjustment.get(mileage).copied()
    }

    pub fn depreciation_rate(&self, month: u32) -> Option<Rate> {
        self.depreciation_curve.get(&month).copied()
    }

    /// Distinct provider names, sorted.
    pub fn providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = self
            .tables
            .keys()
            .filter_map(|key| key.rsplit_once('_').map(|(provider, _)| provider))
            .collect();
        providers.sort_unstable();
        providers.dedup();
        providers
    }

    /// Grades listed for a provider at one period. Without a dedicated
    /// table for the mileage band, the baseline table is listed, as in a
    /// residual lookup.
    pub fn grades(&self, provider: &str, mileage: &str, period: Months) -> Vec<&str> {
        self.table(&Self::table_key(provider, mileage))
            .or_else(|| self.table(&Self::table_key(provider, BASELINE_MILEAGE)))
            .and_then(|table| table.get(&period))
            .map(|grades| grades.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
