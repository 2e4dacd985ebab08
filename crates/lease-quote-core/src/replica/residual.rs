//! Residual-rate lookup against the provider tables.
//!
//! Lookups never fail: a missing provider, period or grade degrades to
//! [`DEFAULT_RESIDUAL_RATE`]. When only the baseline-mileage table exists
//! for a provider, the band's additive offset is applied on top of it. The
//! adjusted rate is not clamped, so it may fall outside `[0, 1]`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::store::ResidualValueTables;
use crate::types::{Months, Rate, ResidualSource, BASELINE_MILEAGE};

pub const DEFAULT_RESIDUAL_RATE: Rate = dec!(0.5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualLookup {
    /// Final rate, offset included
    pub rate: Rate,
    /// Table consulted, `None` when the provider has none
    pub table_key: Option<String>,
    pub source: ResidualSource,
    /// Offset added for the mileage band (zero when not applied)
    pub mileage_adjustment: Rate,
}

impl ResidualLookup {
    pub fn is_default(&self) -> bool {
        self.source != ResidualSource::Table
    }
}

pub fn lookup_residual_rate(
    tables: &ResidualValueTables,
    provider: &str,
    period: Months,
    grade: &str,
    mileage: &str,
) -> ResidualLookup {
    let exact_key = ResidualValueTables::table_key(provider, mileage);
    let (key, on_baseline_fallback) = if tables.table(&exact_key).is_some() {
        (exact_key, false)
    } else {
        (ResidualValueTables::table_key(provider, BASELINE_MILEAGE), true)
    };

    let Some(table) = tables.table(&key) else {
        log::warn!("no residual table for provider '{provider}', using default rate");
        return ResidualLookup {
            rate: DEFAULT_RESIDUAL_RATE,
            table_key: None,
            source: ResidualSource::MissingProvider,
            mileage_adjustment: Decimal::ZERO,
        };
    };

    let (base_rate, source) = match table.get(&period) {
        None => {
            log::warn!("residual table '{key}' does not cover {period} months, using default rate");
            (DEFAULT_RESIDUAL_RATE, ResidualSource::MissingPeriod)
        }
        Some(grades) => match grades.get(grade) {
            Some(rate) => (*rate, ResidualSource::Table),
            None => {
                log::warn!(
                    "residual table '{key}' has no grade '{grade}' at {period} months, using default rate"
                );
                (DEFAULT_RESIDUAL_RATE, ResidualSource::MissingGrade)
            }
        },
    };

    let mileage_adjustment = if on_baseline_fallback && mileage != BASELINE_MILEAGE {
        tables.mileage_offset(mileage).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    log::debug!(
        "residual rate {provider}/{period}/{grade}/{mileage}: {base_rate} + {mileage_adjustment} via '{key}'"
    );

    ResidualLookup {
        rate: base_rate + mileage_adjustment,
        table_key: Some(key),
        source,
        mileage_adjustment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> ResidualValueTables {
        serde_json::from_str(
            r#"{
                "West-Unified_20k": {"36": {"S": 0.58, "A": 0.55}, "60": {"A": 0.99}},
                "West-Unified_30k": {"36": {"A": 0.51}},
                "ADB_20k": {"36": {"A": 0.01}},
                "mileage_adjustment": {"10k": 0.02, "15k": 0.01, "20k": 0, "30k": -0.03}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_lookup() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 36, "A", "20k");
        assert_eq!(r.rate, dec!(0.55));
        assert_eq!(r.source, ResidualSource::Table);
        assert_eq!(r.table_key.as_deref(), Some("West-Unified_20k"));
        assert_eq!(r.mileage_adjustment, Decimal::ZERO);
    }

    #[test]
    fn test_mileage_specific_table_not_adjusted() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 36, "A", "30k");
        assert_eq!(r.rate, dec!(0.51));
        assert_eq!(r.mileage_adjustment, Decimal::ZERO);
    }

    #[test]
    fn test_baseline_plus_offset() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 36, "A", "10k");
        assert_eq!(r.rate, dec!(0.57));
        assert_eq!(r.mileage_adjustment, dec!(0.02));
        assert_eq!(r.table_key.as_deref(), Some("West-Unified_20k"));
    }

    #[test]
    fn test_unknown_band_uses_baseline_without_offset() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 36, "S", "25k");
        assert_eq!(r.rate, dec!(0.58));
        assert_eq!(r.mileage_adjustment, Decimal::ZERO);
    }

    #[test]
    fn test_missing_provider_returns_exact_default() {
        let r = lookup_residual_rate(&tables(), "Joy-Import", 36, "A", "10k");
        assert_eq!(r.rate, dec!(0.5));
        assert_eq!(r.source, ResidualSource::MissingProvider);
        assert!(r.table_key.is_none());
    }

    #[test]
    fn test_missing_period_defaults() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 42, "A", "20k");
        assert_eq!(r.rate, dec!(0.5));
        assert_eq!(r.source, ResidualSource::MissingPeriod);
        assert!(r.is_default());
    }

    #[test]
    fn test_missing_grade_defaults() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 36, "Q", "20k");
        assert_eq!(r.rate, dec!(0.5));
        assert_eq!(r.source, ResidualSource::MissingGrade);
    }

    #[test]
    fn test_default_rate_offset_only_on_baseline_fallback() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 42, "A", "30k");
        // 30k table exists but lacks 42 months: no fallback, no offset
        assert_eq!(r.rate, dec!(0.5));
        let r = lookup_residual_rate(&tables(), "West-Unified", 42, "A", "15k");
        assert_eq!(r.rate, dec!(0.51));
    }

    // Adjusted rates are not clamped back into [0, 1].
    #[test]
    fn test_adjustment_not_clamped_above_one() {
        let r = lookup_residual_rate(&tables(), "West-Unified", 60, "A", "10k");
        assert_eq!(r.rate, dec!(1.01));
    }

    #[test]
    fn test_adjustment_not_clamped_below_zero() {
        let r = lookup_residual_rate(&tables(), "ADB", 36, "A", "30k");
        assert_eq!(r.rate, dec!(-0.02));
    }
}
