use lease_quote_core::replica::{
    acquisition_taxes, compute_replica_quote, lookup_residual_rate, DEFAULT_RESIDUAL_RATE,
    REPLICA_INSTITUTION,
};
use lease_quote_core::{
    ContractTerms, DepositType, EcoType, LeaseQuoteError, ParameterStore, PricingConfig,
    ProductType, QuoteDetails, ReplicaDetails, ResidualSource,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const RESIDUAL_TABLES: &str = include_str!("fixtures/residual_tables.json");
const RATE_PARAMS: &str = include_str!("fixtures/rate_params.json");

fn store() -> ParameterStore {
    ParameterStore::from_json_strs(RESIDUAL_TABLES, RATE_PARAMS).unwrap()
}

fn west_unified_a(price: Decimal) -> ContractTerms {
    let mut terms = ContractTerms::new(price, 36);
    terms.residual_provider = Some("West-Unified".to_string());
    terms.grade = Some("A".to_string());
    terms
}

fn details(out: &lease_quote_core::QuoteResult) -> &ReplicaDetails {
    match &out.details {
        QuoteDetails::Replica(d) => d,
        other => panic!("expected replica details, got {other:?}"),
    }
}

// ===========================================================================
// Residual lookup against the shipped tables
// ===========================================================================

#[test]
fn test_every_provider_has_a_baseline_table() {
    let store = store();
    let providers = store.residual().providers();
    assert_eq!(
        providers,
        vec![
            "ADB",
            "Correct",
            "Cube-Import",
            "Joy-Import",
            "Muca-Domestic",
            "Taeyang-Import",
            "West-Import",
            "West-Unified",
        ]
    );
    for provider in providers {
        let r = lookup_residual_rate(store.residual(), provider, 36, "A", "20k");
        assert_eq!(r.source, ResidualSource::Table, "{provider}");
    }
}

#[test]
fn test_residual_mileage_resolution() {
    let store = store();
    let tables = store.residual();
    assert_eq!(lookup_residual_rate(tables, "West-Unified", 36, "A", "20k").rate, dec!(0.55));
    // Dedicated 30k table, no offset
    assert_eq!(lookup_residual_rate(tables, "West-Unified", 36, "A", "30k").rate, dec!(0.51));
    // No 10k table: baseline plus offset
    assert_eq!(lookup_residual_rate(tables, "West-Unified", 36, "A", "10k").rate, dec!(0.57));
    assert_eq!(lookup_residual_rate(tables, "ADB", 36, "A", "30k").rate, dec!(0.49));
}

#[test]
fn test_residual_defaults_for_absent_combinations() {
    let store = store();
    let tables = store.residual();
    assert_eq!(lookup_residual_rate(tables, "Nobody", 36, "A", "20k").rate, DEFAULT_RESIDUAL_RATE);
    assert_eq!(lookup_residual_rate(tables, "ADB", 42, "A", "20k").rate, DEFAULT_RESIDUAL_RATE);
    assert_eq!(lookup_residual_rate(tables, "ADB", 36, "Z", "20k").rate, DEFAULT_RESIDUAL_RATE);
}

// ===========================================================================
// Taxes
// ===========================================================================

#[test]
fn test_standard_vehicle_taxes() {
    let taxes = acquisition_taxes(
        dec!(110_000_000),
        EcoType::Standard,
        &PricingConfig::default().replica,
    );
    assert_eq!(taxes.supply_price, dec!(100_000_000));
    assert_eq!(taxes.acquisition_tax, dec!(2_000_000));
    assert_eq!(taxes.registration_tax, dec!(5_000_000));
}

// ===========================================================================
// Lease and rental quotes
// ===========================================================================

#[test]
fn test_domestic_lease_reference() {
    let out = compute_replica_quote(
        &store(),
        ProductType::Lease,
        &west_unified_a(dec!(100_000_000)),
        &PricingConfig::default(),
    )
    .unwrap();
    let d = details(&out.result);

    assert_eq!(out.result.company, REPLICA_INSTITUTION);
    assert_eq!(d.acquisition_cost, dec!(106_363_630));
    assert_eq!(
        d.acquisition_cost,
        d.base_price + d.registration_tax + d.acquisition_tax
    );
    assert_eq!(d.residual_value, dec!(58_499_996.5));
    assert_eq!(out.result.monthly_payment, dec!(1_741_704));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_imported_lease_lowers_residual() {
    let mut terms = west_unified_a(dec!(100_000_000));
    terms.domestic = false;
    let out = compute_replica_quote(&store(), ProductType::Lease, &terms, &PricingConfig::default())
        .unwrap();
    let d = details(&out.result);
    assert_eq!(d.residual_base, dec!(100_000_000));
    assert_eq!(d.residual_value, dec!(55_000_000));
    // 1,426,767.5 + 403,409.075
    assert_eq!(out.result.monthly_payment, dec!(1_830_177));
}

#[test]
fn test_mileage_bands_change_payment() {
    let store = store();
    let config = PricingConfig::default();
    let payment = |mileage: &str| {
        let mut terms = west_unified_a(dec!(100_000_000));
        terms.mileage = mileage.to_string();
        compute_replica_quote(&store, ProductType::Lease, &terms, &config)
            .unwrap()
            .result
            .monthly_payment
    };
    assert_eq!(payment("10k"), dec!(1_687_932));
    assert_eq!(payment("20k"), dec!(1_741_704));
    assert_eq!(payment("30k"), dec!(1_849_250));
}

#[test]
fn test_rental_on_top_of_lease() {
    let out = compute_replica_quote(
        &store(),
        ProductType::Rent,
        &west_unified_a(dec!(100_000_000)),
        &PricingConfig::default(),
    )
    .unwrap();
    assert_eq!(out.result.product, ProductType::Rent);
    assert_eq!(out.result.monthly_payment, dec!(2_241_704));
    assert_eq!(details(&out.result).rental_surcharge, Some(dec!(500_000)));
}

#[test]
fn test_identical_terms_identical_output() {
    let store = store();
    let mut terms = west_unified_a(dec!(64_500_000));
    terms.deposit_type = DepositType::Advance;
    terms.deposit_rate = dec!(20);
    terms.dealer_discount = dec!(1_200_000);
    let a = compute_replica_quote(&store, ProductType::Lease, &terms, &PricingConfig::default())
        .unwrap();
    let b = compute_replica_quote(&store, ProductType::Lease, &terms, &PricingConfig::default())
        .unwrap();
    assert_eq!(a.result.trace, b.result.trace);
    assert_eq!(a.result.monthly_payment, b.result.monthly_payment);
}

#[test]
fn test_config_override_changes_financing() {
    let config: PricingConfig =
        PricingConfig::from_json_str(r#"{"replica": {"annual_financing_rate": 0.048}}"#).unwrap();
    let out = compute_replica_quote(
        &store(),
        ProductType::Lease,
        &west_unified_a(dec!(100_000_000)),
        &config,
    )
    .unwrap();
    // Lower rate -> lower financing cost, depreciation unchanged
    assert!(out.result.monthly_payment < dec!(1_741_704));
    assert_eq!(details(&out.result).monthly_depreciation, dec!(1_329_545.375));
}

#[test]
fn test_missing_provider_is_invalid_input() {
    let mut terms = west_unified_a(dec!(100_000_000));
    terms.residual_provider = None;
    let err = compute_replica_quote(&store(), ProductType::Lease, &terms, &PricingConfig::default())
        .unwrap_err();
    match err {
        LeaseQuoteError::InvalidInput { field, .. } => assert_eq!(field, "residual_provider"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_oversized_price_is_rejected_before_pricing() {
    for product in [ProductType::Lease, ProductType::Rent] {
        let err = compute_replica_quote(
            &store(),
            product,
            &west_unified_a(Decimal::MAX),
            &PricingConfig::default(),
        )
        .unwrap_err();
        match err {
            LeaseQuoteError::InvalidInput { field, .. } => assert_eq!(field, "vehicle_price"),
            other => panic!("unexpected error {other}"),
        }
    }
}
