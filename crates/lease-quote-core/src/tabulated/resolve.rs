use crate::store::{condition_key, CompanyConditions, ConditionParameters};
use crate::types::{ConditionMatch, Months};

/// A stored condition chosen to answer a (period, mileage) request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCondition<'a> {
    pub key: &'a str,
    pub params: &'a ConditionParameters,
    pub matched: ConditionMatch,
}

/// Pick the condition for `period`/`mileage`.
///
/// Exact key first, then the first condition (in key order) with the same
/// period, then the first condition overall. `None` only when the company
/// has no conditions at all.
pub fn resolve_condition<'a>(
    conditions: &'a CompanyConditions,
    period: Months,
    mileage: &str,
) -> Option<ResolvedCondition<'a>> {
    let requested = condition_key(period, mileage);
    if let Some((key, params)) = conditions.get_key_value(&requested) {
        return Some(ResolvedCondition {
            key,
            params,
            matched: ConditionMatch::Exact,
        });
    }

    if let Some((key, params)) = conditions.iter().find(|(_, c)| c.period == period) {
        log::debug!("condition {requested} not found, using same-period {key}");
        return Some(ResolvedCondition {
            key,
            params,
            matched: ConditionMatch::SamePeriod,
        });
    }

    let (key, params) = conditions.iter().next()?;
    log::debug!("no condition for {period} months, falling back to {key}");
    Some(ResolvedCondition {
        key,
        params,
        matched: ConditionMatch::AnyCondition,
    })
}
