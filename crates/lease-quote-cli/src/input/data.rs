use std::path::PathBuf;

use lease_quote_core::{ParameterStore, PricingConfig};

use crate::input::file;

/// Data files shared by every pricing command.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub residual_tables: PathBuf,
    pub rate_params: PathBuf,
    pub config: Option<PathBuf>,
}

impl DataPaths {
    pub fn load_store(&self) -> Result<ParameterStore, Box<dyn std::error::Error>> {
        Ok(ParameterStore::load(&self.residual_tables, &self.rate_params)?)
    }

    /// Defaults unless `--config` points at an override file.
    pub fn load_config(&self) -> Result<PricingConfig, Box<dyn std::error::Error>> {
        let Some(path) = &self.config else {
            return Ok(PricingConfig::default());
        };
        let config: PricingConfig = file::read_structured(path)?;
        config.validate()?;
        log::debug!("pricing config loaded from {}", path.display());
        Ok(config)
    }
}
