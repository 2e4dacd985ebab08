use crate::config::ReplicaAssumptions;
use crate::replica::lease::replica_lease_quote;
use crate::store::ParameterStore;
use crate::trace::{krw, pct, Trace};
use crate::types::{round_currency, ContractTerms, ProductType, QuoteDetails, QuoteResult};
use crate::LeaseQuoteResult;

/// Rental payment: the lease payment plus a flat monthly surcharge on the
/// vehicle price covering insurance and vehicle tax.
pub fn replica_rental_quote(
    store: &ParameterStore,
    terms: &ContractTerms,
    assumptions: &ReplicaAssumptions,
) -> LeaseQuoteResult<QuoteResult> {
    let lease = replica_lease_quote(store, terms, assumptions)?;

    let surcharge = terms.vehicle_price * assumptions.rental_surcharge_rate;
    let monthly_payment = round_currency(lease.monthly_payment + surcharge);

    let mut trace = Trace::from_lines(lease.trace);
    trace.section("Rental surcharge");
    trace.line(format!(
        "Insurance and tax: {} x {} = {}",
        krw(terms.vehicle_price),
        pct(assumptions.rental_surcharge_rate),
        krw(surcharge)
    ));
    trace.section("Final rental payment");
    trace.line(format!(
        "{} + {} = {}",
        krw(lease.monthly_payment),
        krw(surcharge),
        krw(monthly_payment)
    ));

    let details = match lease.details {
        QuoteDetails::Replica(mut d) => {
            d.rental_surcharge = Some(surcharge);
            QuoteDetails::Replica(d)
        }
        other => other,
    };

    Ok(QuoteResult {
        product: ProductType::Rent,
        monthly_payment,
        trace: trace.into_lines(),
        details,
        ..lease
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CompanyRateParameters, ResidualValueTables};
    use rust_decimal_macros::dec;

    fn store() -> ParameterStore {
        let residual: ResidualValueTables =
            serde_json::from_str(r#"{"West-Unified_20k": {"36": {"A": 0.55}}}"#).unwrap();
        ParameterStore::new(residual, CompanyRateParameters::default())
    }

    fn terms() -> ContractTerms {
        let mut terms = ContractTerms::new(dec!(100000000), 36);
        terms.residual_provider = Some("West-Unified".to_string());
        terms.grade = Some("A".to_string());
        terms
    }

    #[test]
    fn test_rental_adds_half_percent_of_price() {
        let a = ReplicaAssumptions::default();
        let lease = replica_lease_quote(&store(), &terms(), &a).unwrap();
        let rental = replica_rental_quote(&store(), &terms(), &a).unwrap();
        assert_eq!(lease.monthly_payment, dec!(1741704));
        assert_eq!(rental.monthly_payment, dec!(2241704));
        assert_eq!(rental.product, ProductType::Rent);
        match &rental.details {
            QuoteDetails::Replica(d) => assert_eq!(d.rental_surcharge, Some(dec!(500000))),
            other => panic!("unexpected details {other:?}"),
        }
    }

    #[test]
    fn test_rental_trace_extends_lease_trace() {
        let a = ReplicaAssumptions::default();
        let lease = replica_lease_quote(&store(), &terms(), &a).unwrap();
        let rental = replica_rental_quote(&store(), &terms(), &a).unwrap();
        assert_eq!(&rental.trace[..lease.trace.len()], &lease.trace[..]);
        assert_eq!(
            rental.trace.last().unwrap(),
            "1,741,704 KRW + 500,000 KRW = 2,241,704 KRW"
        );
    }

    #[test]
    fn test_surcharge_on_vehicle_price_only() {
        let mut with_option = terms();
        with_option.vehicle_price = dec!(90000000);
        with_option.option_price = dec!(10000000);
        let a = ReplicaAssumptions::default();
        let lease = replica_lease_quote(&store(), &with_option, &a).unwrap();
        let rental = replica_rental_quote(&store(), &with_option, &a).unwrap();
        assert_eq!(rental.monthly_payment - lease.monthly_payment, dec!(450000));
    }
}
