//! Read-only parameter store shared by every quote computation.
//!
//! The store is loaded once by the host and passed by reference into the
//! engines; nothing in the pricing path mutates it.

pub mod rate_params;
pub mod residual_table;

#[cfg(feature = "aggregation")]
pub mod aggregate;

use std::fs;
use std::path::Path;

use crate::error::LeaseQuoteError;
use crate::types::ProductType;
use crate::LeaseQuoteResult;

pub use rate_params::{condition_key, CompanyConditions, CompanyRateParameters, ConditionParameters};
pub use residual_table::ResidualValueTables;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    residual: ResidualValueTables,
    rates: CompanyRateParameters,
}

impl ParameterStore {
    pub fn new(residual: ResidualValueTables, rates: CompanyRateParameters) -> Self {
        Self { residual, rates }
    }

    /// Parse both artifacts from their JSON text.
    pub fn from_json_strs(residual_json: &str, rates_json: &str) -> LeaseQuoteResult<Self> {
        let residual: ResidualValueTables = serde_json::from_str(residual_json)?;
        let rates: CompanyRateParameters = serde_json::from_str(rates_json)?;
        Ok(Self::new(residual, rates))
    }

    /// Read both artifacts from disk.
    pub fn load(residual_path: &Path, rates_path: &Path) -> LeaseQuoteResult<Self> {
        let residual_json = read_artifact(residual_path)?;
        let rates_json = read_artifact(rates_path)?;
        let store = Self::from_json_strs(&residual_json, &rates_json)?;
        log::info!(
            "loaded parameter store: {} residual tables, {} lease / {} rent companies",
            store.residual.tables.len(),
            store.rates.lease.len(),
            store.rates.rent.len()
        );
        Ok(store)
    }

    pub fn residual(&self) -> &ResidualValueTables {
        &self.residual
    }

    pub fn rates(&self) -> &CompanyRateParameters {
        &self.rates
    }

    pub fn companies(&self, product: ProductType) -> Vec<&str> {
        self.rates.companies(product)
    }
}

fn read_artifact(path: &Path) -> LeaseQuoteResult<String> {
    fs::read_to_string(path)
        .map_err(|e| LeaseQuoteError::DataLoad(format!("failed to read '{}': {}", path.display(), e)))
}
