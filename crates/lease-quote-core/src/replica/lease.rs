//! Operating-lease quote, reproduced step by step from the institution's
//! quotation spreadsheet.
//!
//! The steps run in a fixed order because each one consumes values derived
//! by the previous ones, and the trace narrates them in that same order.
//! The dealer discount is amortized into the monthly payment only; it never
//! reduces the acquisition cost used for depreciation and residual value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::ReplicaAssumptions;
use crate::error::LeaseQuoteError;
use crate::replica::residual::lookup_residual_rate;
use crate::replica::tax::acquisition_taxes;
use crate::replica::REPLICA_INSTITUTION;
use crate::store::ParameterStore;
use crate::trace::{krw, pct, Trace};
use crate::types::{
    round_currency, ContractTerms, DepositType, EcoType, ProductType, QuoteDetails,
    QuoteResult, ReplicaDetails, ResidualSource,
};
use crate::LeaseQuoteResult;

/// Compute the formula-replica lease payment for `terms`.
pub fn replica_lease_quote(
    store: &ParameterStore,
    terms: &ContractTerms,
    assumptions: &ReplicaAssumptions,
) -> LeaseQuoteResult<QuoteResult> {
    terms.validate()?;
    let (provider, grade) = residual_selection(terms)?;
    let period = Decimal::from(terms.period_months);
    let mut trace = Trace::new();

    // 1. Base price (dealer discount not subtracted)
    let base_price = terms.vehicle_price + terms.option_price;
    trace.section("Vehicle");
    trace.line(format!("Vehicle price: {}", krw(terms.vehicle_price)));
    trace.line(format!("Option price: {}", krw(terms.option_price)));
    trace.line(format!(
        "Base price: {} + {} = {}",
        krw(terms.vehicle_price),
        krw(terms.option_price),
        krw(base_price)
    ));

    // 2. Taxes on the base price
    let taxes = acquisition_taxes(base_price, terms.eco_type, assumptions);
    trace.section("Taxes");
    trace.line(format!(
        "Supply price: {} / {} = {}",
        krw(base_price),
        assumptions.vat_divisor,
        krw(taxes.supply_price)
    ));
    trace.line(format!(
        "Acquisition tax: {} x {} = {}",
        krw(taxes.supply_price),
        pct(assumptions.acquisition_tax_rate),
        krw(taxes.acquisition_tax)
    ));
    trace.line(format!(
        "Registration tax ({}): {} x {} = {}",
        eco_label(terms.eco_type),
        krw(taxes.supply_price),
        pct(taxes.registration_tax_rate),
        krw(taxes.registration_tax)
    ));

    // 3. Acquisition cost (public bond cost omitted)
    let acquisition_cost = base_price + taxes.registration_tax + taxes.acquisition_tax;
    trace.line(format!(
        "Acquisition cost: {} + {} + {} = {}",
        krw(base_price),
        krw(taxes.registration_tax),
        krw(taxes.acquisition_tax),
        krw(acquisition_cost)
    ));

    // 4. Residual base: domestic on acquisition cost, imported on base price
    let residual_base = if terms.domestic {
        acquisition_cost
    } else {
        base_price
    };
    trace.section("Residual value");
    trace.line(format!(
        "Residual base ({}): {}",
        if terms.domestic {
            "domestic, acquisition cost"
        } else {
            "imported, base price"
        },
        krw(residual_base)
    ));

    // 5. Residual rate and value
    let lookup = lookup_residual_rate(
        store.residual(),
        provider,
        terms.period_months,
        grade,
        &terms.mileage,
    );
    let residual_value = residual_base * lookup.rate;
    trace.line(format!(
        "Residual rate: {} ({}, {} months, grade {}, {}){}",
        pct(lookup.rate),
        provider,
        terms.period_months,
        grade,
        terms.mileage,
        source_note(lookup.source)
    ));
    if !lookup.mileage_adjustment.is_zero() {
        trace.line(format!(
            "Mileage adjustment ({}): {}{} on the {} table",
            terms.mileage,
            if lookup.mileage_adjustment > Decimal::ZERO { "+" } else { "" },
            pct(lookup.mileage_adjustment),
            lookup.table_key.as_deref().unwrap_or("baseline")
        ));
    }
    trace.line(format!(
        "Residual value: {} x {:.4} = {}",
        krw(residual_base),
        lookup.rate,
        krw(residual_value)
    ));

    // 6. Depreciation
    let depreciation = acquisition_cost - residual_value;
    let monthly_depreciation = depreciation / period;
    trace.section("Depreciation");
    trace.line(format!(
        "Depreciation: {} - {} = {}",
        krw(acquisition_cost),
        krw(residual_value),
        krw(depreciation)
    ));
    trace.line(format!(
        "Monthly depreciation: {} / {} months = {}",
        krw(depreciation),
        terms.period_months,
        krw(monthly_depreciation)
    ));

    // 7. Financing cost on the average balance
    let monthly_rate = assumptions.monthly_financing_rate();
    let average_balance = (acquisition_cost + residual_value) / dec!(2);
    let monthly_financing_cost = average_balance * monthly_rate;
    trace.section("Financing cost");
    trace.line(format!(
        "Monthly rate: {} / 12 = {}",
        pct(assumptions.annual_financing_rate),
        pct(monthly_rate)
    ));
    trace.line(format!(
        "Average balance: ({} + {}) / 2 = {}",
        krw(acquisition_cost),
        krw(residual_value),
        krw(average_balance)
    ));
    trace.line(format!(
        "Monthly financing cost: {} x {} = {}",
        krw(average_balance),
        pct(monthly_rate),
        krw(monthly_financing_cost)
    ));

    // 8. Base monthly payment
    let base_monthly_payment = monthly_depreciation + monthly_financing_cost;
    trace.section("Base monthly payment");
    trace.line(format!(
        "{} + {} = {}",
        krw(monthly_depreciation),
        krw(monthly_financing_cost),
        krw(base_monthly_payment)
    ));

    // 9. Deposit / advance
    let deposit_rate = terms.effective_deposit_rate();
    let upfront = acquisition_cost * deposit_rate / dec!(100);
    let deposit_discount = match terms.deposit_type {
        DepositType::None => Decimal::ZERO,
        DepositType::Deposit => upfront * monthly_rate,
        DepositType::Advance => upfront / period,
    };
    trace.section("Deposit / advance");
    match terms.deposit_type {
        DepositType::None => trace.line("No deposit or advance: 0 KRW"),
        DepositType::Deposit => {
            trace.line(format!(
                "Deposit: {} x {}% = {}",
                krw(acquisition_cost),
                deposit_rate,
                krw(upfront)
            ));
            trace.line(format!(
                "Monthly interest offset: {} x {} = {}",
                krw(upfront),
                pct(monthly_rate),
                krw(deposit_discount)
            ));
        }
        DepositType::Advance => {
            trace.line(format!(
                "Advance: {} x {}% = {}",
                krw(acquisition_cost),
                deposit_rate,
                krw(upfront)
            ));
            trace.line(format!(
                "Monthly reduction: {} / {} months = {}",
                krw(upfront),
                terms.period_months,
                krw(deposit_discount)
            ));
        }
    }

    // 10. Dealer discount, amortized over the term
    let dealer_discount_reduction = terms.dealer_discount / period;
    trace.section("Dealer discount");
    trace.line(format!(
        "Monthly reduction: {} / {} months = {} (acquisition cost unchanged)",
        krw(terms.dealer_discount),
        terms.period_months,
        krw(dealer_discount_reduction)
    ));

    // 11. Final payment
    let unrounded = base_monthly_payment - deposit_discount - dealer_discount_reduction;
    let monthly_payment = round_currency(unrounded);
    trace.section("Final monthly payment");
    trace.line(format!(
        "{} - {} - {} = {}",
        krw(base_monthly_payment),
        krw(deposit_discount),
        krw(dealer_discount_reduction),
        krw(monthly_payment)
    ));

    Ok(QuoteResult {
        company: REPLICA_INSTITUTION.to_string(),
        product: ProductType::Lease,
        payment_type: terms.deposit_type,
        monthly_payment,
        trace: trace.into_lines(),
        details: QuoteDetails::Replica(ReplicaDetails {
            vehicle_price: terms.vehicle_price,
            option_price: terms.option_price,
            base_price,
            supply_price: taxes.supply_price,
            acquisition_tax: taxes.acquisition_tax,
            registration_tax: taxes.registration_tax,
            acquisition_cost,
            residual_base,
            residual_rate: lookup.rate,
            residual_value,
            residual_table: lookup.table_key,
            residual_source: lookup.source,
            mileage_adjustment: lookup.mileage_adjustment,
            monthly_depreciation,
            monthly_financing_cost,
            base_monthly_payment,
            deposit_discount,
            dealer_discount_reduction,
            rental_surcharge: None,
        }),
    })
}

/// Provider and grade are mandatory for the replica engine.
pub(crate) fn residual_selection(terms: &ContractTerms) -> LeaseQuoteResult<(&str, &str)> {
    let provider = terms
        .residual_provider
        .as_deref()
        .ok_or_else(|| LeaseQuoteError::InvalidInput {
            field: "residual_provider".into(),
            reason: "A residual-value provider is required for the replica engine".into(),
        })?;
    let grade = terms
        .grade
        .as_deref()
        .ok_or_else(|| LeaseQuoteError::InvalidInput {
            field: "grade".into(),
            reason: "A residual-value grade is required for the replica engine".into(),
        })?;
    Ok((provider, grade))
}

fn eco_label(eco_type: EcoType) -> &'static str {
    match eco_type {
        EcoType::Standard => "standard",
        EcoType::Hybrid => "hybrid",
        EcoType::Electric => "electric",
    }
}

fn source_note(source: ResidualSource) -> &'static str {
    match source {
        ResidualSource::Table => "",
        ResidualSource::MissingPeriod => " [period not in table, default]",
        ResidualSource::MissingGrade => " [grade not in table, default]",
        ResidualSource::MissingProvider => " [no table for provider, default]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CompanyRateParameters, ResidualValueTables};

    fn store() -> ParameterStore {
        let residual: ResidualValueTables = serde_json::from_str(
            r#"{
                "West-Unified_20k": {"36": {"S": 0.58, "A": 0.55}, "48": {"A": 0.47}},
                "mileage_adjustment": {"10k": 0.02, "20k": 0, "30k": -0.03}
            }"#,
        )
        .unwrap();
        ParameterStore::new(residual, CompanyRateParameters::default())
    }

    fn domestic_terms() -> ContractTerms {
        let mut terms = ContractTerms::new(dec!(100000000), 36);
        terms.residual_provider = Some("West-Unified".to_string());
        terms.grade = Some("A".to_string());
        terms
    }

    fn details(quote: &QuoteResult) -> &ReplicaDetails {
        match &quote.details {
            QuoteDetails::Replica(d) => d,
            other => panic!("expected replica details, got {other:?}"),
        }
    }

    #[test]
    fn test_domestic_reference_quote() {
        let quote = replica_lease_quote(&store(), &domestic_terms(), &ReplicaAssumptions::default())
            .unwrap();
        let d = details(&quote);

        assert_eq!(d.base_price, dec!(100000000));
        assert_eq!(d.acquisition_tax, dec!(1818180));
        assert_eq!(d.registration_tax, dec!(4545450));
        assert_eq!(
            d.acquisition_cost,
            d.base_price + d.registration_tax + d.acquisition_tax
        );
        assert_eq!(d.acquisition_cost, dec!(106363630));
        assert_eq!(d.residual_base, d.acquisition_cost);
        assert_eq!(d.residual_rate, dec!(0.55));
        assert_eq!(d.residual_value, dec!(58499996.5));
        assert_eq!(d.monthly_depreciation, dec!(1329545.375));
        assert_eq!(d.monthly_financing_cost, dec!(412159.06625));
        assert_eq!(quote.monthly_payment, dec!(1741704));
        assert_eq!(quote.company, REPLICA_INSTITUTION);
        assert_eq!(quote.product, ProductType::Lease);
    }

    #[test]
    fn test_imported_uses_base_price_as_residual_base() {
        let mut terms = domestic_terms();
        let domestic = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default())
            .unwrap();
        terms.domestic = false;
        let imported = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default())
            .unwrap();

        let (dd, di) = (details(&domestic), details(&imported));
        assert_eq!(di.residual_base, di.base_price);
        assert_eq!(di.residual_value, dec!(55000000));
        assert!(di.residual_value < dd.residual_value);
        // Same acquisition cost, lower residual -> higher depreciation
        assert_eq!(di.acquisition_cost, dd.acquisition_cost);
        assert!(imported.monthly_payment > domestic.monthly_payment);
    }

    #[test]
    fn test_deposit_offsets_interest() {
        let mut terms = domestic_terms();
        terms.deposit_type = DepositType::Deposit;
        terms.deposit_rate = dec!(30);
        let quote = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        // 106,363,630 x 30% x 0.5%
        assert_eq!(details(&quote).deposit_discount, dec!(159545.445));
        assert_eq!(quote.monthly_payment, dec!(1582159));
        assert_eq!(quote.payment_type, DepositType::Deposit);
    }

    #[test]
    fn test_advance_amortized_as_principal() {
        let mut terms = domestic_terms();
        terms.deposit_type = DepositType::Advance;
        terms.deposit_rate = dec!(30);
        let quote = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        // 31,909,089 / 36
        let expected = dec!(31909089) / dec!(36);
        assert_eq!(details(&quote).deposit_discount, expected);
        assert!(quote.monthly_payment < dec!(1741704));
    }

    #[test]
    fn test_zero_deposit_rate_gives_zero_discount() {
        for deposit_type in [DepositType::None, DepositType::Deposit, DepositType::Advance] {
            let mut terms = domestic_terms();
            terms.deposit_type = deposit_type;
            terms.deposit_rate = Decimal::ZERO;
            let quote =
                replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
            assert_eq!(details(&quote).deposit_discount, Decimal::ZERO);
            assert_eq!(quote.monthly_payment, dec!(1741704));
        }
    }

    #[test]
    fn test_dealer_discount_amortized_not_capitalized() {
        let mut terms = domestic_terms();
        terms.dealer_discount = dec!(3600000);
        let quote = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        let d = details(&quote);
        assert_eq!(d.dealer_discount_reduction, dec!(100000));
        assert_eq!(d.acquisition_cost, dec!(106363630));
        assert_eq!(quote.monthly_payment, dec!(1641704));
    }

    #[test]
    fn test_dealer_discount_strictly_decreases_payment() {
        let mut previous = None;
        for discount in [0, 500000, 1000000, 2000000, 5000000] {
            let mut terms = domestic_terms();
            terms.dealer_discount = Decimal::from(discount);
            let quote =
                replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
            if let Some(prev) = previous {
                assert!(quote.monthly_payment < prev);
            }
            previous = Some(quote.monthly_payment);
        }
    }

    #[test]
    fn test_electric_pays_lower_registration_tax() {
        let mut terms = domestic_terms();
        terms.eco_type = EcoType::Electric;
        let quote = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        assert_eq!(details(&quote).registration_tax, dec!(1818180));
    }

    #[test]
    fn test_option_price_included_in_base() {
        let mut terms = domestic_terms();
        terms.vehicle_price = dec!(95000000);
        terms.option_price = dec!(5000000);
        let with_option =
            replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        let plain =
            replica_lease_quote(&store(), &domestic_terms(), &ReplicaAssumptions::default())
                .unwrap();
        assert_eq!(with_option.monthly_payment, plain.monthly_payment);
    }

    #[test]
    fn test_idempotent() {
        let terms = domestic_terms();
        let a = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        let b = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_narrates_steps_in_order() {
        let quote = replica_lease_quote(&store(), &domestic_terms(), &ReplicaAssumptions::default())
            .unwrap();
        let sections: Vec<&str> = quote
            .trace
            .iter()
            .filter(|l| l.starts_with("==="))
            .map(String::as_str)
            .collect();
        assert_eq!(
            sections,
            vec![
                "=== Vehicle ===",
                "=== Taxes ===",
                "=== Residual value ===",
                "=== Depreciation ===",
                "=== Financing cost ===",
                "=== Base monthly payment ===",
                "=== Deposit / advance ===",
                "=== Dealer discount ===",
                "=== Final monthly payment ===",
            ]
        );
        assert!(quote
            .trace
            .contains(&"Acquisition cost: 100,000,000 KRW + 4,545,450 KRW + 1,818,180 KRW = 106,363,630 KRW".to_string()));
        assert_eq!(
            quote.trace.last().unwrap(),
            "1,741,704 KRW - 0 KRW - 0 KRW = 1,741,704 KRW"
        );
    }

    #[test]
    fn test_mileage_offset_flows_into_residual() {
        let mut terms = domestic_terms();
        terms.mileage = "30k".to_string();
        let quote = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap();
        let d = details(&quote);
        assert_eq!(d.residual_rate, dec!(0.52));
        assert_eq!(d.mileage_adjustment, dec!(-0.03));
        assert!(quote.trace.iter().any(|l| l.starts_with("Mileage adjustment (30k): -3.00%")));
    }

    #[test]
    fn test_missing_grade_rejected() {
        let mut terms = domestic_terms();
        terms.grade = None;
        let err = replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).unwrap_err();
        assert!(matches!(err, LeaseQuoteError::InvalidInput { ref field, .. } if field == "grade"));
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut terms = domestic_terms();
        terms.period_months = 0;
        assert!(replica_lease_quote(&store(), &terms, &ReplicaAssumptions::default()).is_err());
    }
}
