use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::TabulatedAssumptions;
use crate::error::LeaseQuoteError;
use crate::store::{condition_key, ParameterStore};
use crate::tabulated::resolve::resolve_condition;
use crate::trace::{krw, pct, Trace};
use crate::types::{
    round_currency, ConditionMatch, ContractTerms, DepositType, ProductType, QuoteDetails,
    QuoteResult, Rate, TabulatedDetails,
};
use crate::LeaseQuoteResult;

/// Price `terms` for one company from its averaged rate parameters.
pub fn tabulated_quote(
    store: &ParameterStore,
    product: ProductType,
    company: &str,
    terms: &ContractTerms,
    assumptions: &TabulatedAssumptions,
) -> LeaseQuoteResult<QuoteResult> {
    terms.validate()?;

    let conditions = store.rates().conditions(product, company).ok_or_else(|| {
        LeaseQuoteError::MissingParameters(format!("no {product} parameters for company '{company}'"))
    })?;
    let resolved = resolve_condition(conditions, terms.period_months, &terms.mileage)
        .ok_or_else(|| {
            LeaseQuoteError::MissingParameters(format!(
                "company '{company}' has no {product} conditions"
            ))
        })?;
    let params = resolved.params;
    let requested = condition_key(terms.period_months, &terms.mileage);

    let mut trace = Trace::new();
    trace.section("Parameters");
    trace.line(format!("Company: {company} ({product})"));
    match resolved.matched {
        ConditionMatch::Exact => trace.line(format!("Condition: {requested}")),
        ConditionMatch::SamePeriod => trace.line(format!(
            "Condition: {requested} not found, using {} (same period)",
            resolved.key
        )),
        ConditionMatch::AnyCondition => trace.line(format!(
            "Condition: {requested} not found, using {} (no condition for {} months)",
            resolved.key, terms.period_months
        )),
    }
    trace.line(format!(
        "Base rate {}%, option coefficient {}, {} samples",
        params.base_rate, params.option_coefficient, params.sample_count
    ));

    let base_monthly = terms.vehicle_price * params.base_rate / dec!(100);
    trace.section("Base monthly payment");
    trace.line(format!(
        "{} x {}% = {}",
        krw(terms.vehicle_price),
        params.base_rate,
        krw(base_monthly)
    ));

    let option_addition = params.option_coefficient * (terms.option_price - terms.dealer_discount);
    trace.section("Option addition");
    trace.line(format!(
        "{} x ({} - {}) = {}",
        params.option_coefficient,
        krw(terms.option_price),
        krw(terms.dealer_discount),
        krw(option_addition)
    ));

    let deposit_discount_rate = deposit_discount_rate(terms, assumptions);
    let deposit_discount = base_monthly * deposit_discount_rate;
    trace.section("Deposit / advance");
    if deposit_discount_rate.is_zero() {
        trace.line("No deposit or advance: 0 KRW");
    } else {
        trace.line(format!(
            "{} {}%: discount rate {}",
            capitalize(&terms.deposit_type.to_string()),
            terms.deposit_rate,
            pct(deposit_discount_rate)
        ));
        trace.line(format!(
            "{} x {} = {}",
            krw(base_monthly),
            pct(deposit_discount_rate),
            krw(deposit_discount)
        ));
    }

    let dealer_fee_addition =
        terms.vehicle_price * terms.dealer_fee_rate / dec!(100) * assumptions.dealer_fee_damping;
    trace.section("Dealer fee");
    trace.line(format!(
        "{} x {}% x {} = {}",
        krw(terms.vehicle_price),
        terms.dealer_fee_rate,
        assumptions.dealer_fee_damping,
        krw(dealer_fee_addition)
    ));

    let monthly_payment =
        round_currency(base_monthly + option_addition - deposit_discount + dealer_fee_addition);
    trace.section("Final monthly payment");
    trace.line(format!(
        "{} + {} - {} + {} = {}",
        krw(base_monthly),
        krw(option_addition),
        krw(deposit_discount),
        krw(dealer_fee_addition),
        krw(monthly_payment)
    ));

    Ok(QuoteResult {
        company: company.to_string(),
        product,
        payment_type: terms.deposit_type,
        monthly_payment,
        trace: trace.into_lines(),
        details: QuoteDetails::Tabulated(TabulatedDetails {
            requested_condition: requested,
            resolved_condition: resolved.key.to_string(),
            condition_match: resolved.matched,
            base_rate: params.base_rate,
            option_coefficient: params.option_coefficient,
            residual_rate: params.residual_rate,
            sample_count: params.sample_count,
            base_monthly,
            option_addition,
            deposit_discount_rate,
            deposit_discount,
            dealer_fee_addition,
        }),
    })
}

/// Discount rates scale linearly from their value at the reference percentage.
fn deposit_discount_rate(terms: &ContractTerms, assumptions: &TabulatedAssumptions) -> Rate {
    let at_reference = match terms.deposit_type {
        DepositType::None => return Decimal::ZERO,
        DepositType::Deposit => assumptions.deposit_discount_at_reference,
        DepositType::Advance => assumptions.advance_discount_at_reference,
    };
    terms.effective_deposit_rate() * at_reference / assumptions.reference_deposit_rate
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
