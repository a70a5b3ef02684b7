//! Filtering utilities for document matching.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::warn;

use crate::{
    comparison::{compare_values, field_equals, string_form},
    query::Condition,
    Document,
    Filter,
};

/// Checks if a document satisfies every condition of the filter.
///
/// An empty filter matches every document.
pub fn matches(doc: &Document, filter: &Filter) -> bool {
    filter
        .conditions()
        .iter()
        .all(|(field, condition)| matches_condition(doc.get(field), field, condition))
}

fn matches_condition(value: Option<&Value>, field: &str, condition: &Condition) -> bool {
    match *condition {
        Condition::Equals(ref literal) => field_equals(value, literal),
        Condition::Ne(ref literal) => !field_equals(value, literal),
        Condition::In(ref candidates) => candidates.iter().any(|c| field_equals(value, c)),
        Condition::Regex(ref regex) => regex.is_match(&string_form(value)),
        Condition::Gte(ref bound) => range_check(value, field, "$gte", bound, |o| o != Ordering::Less),
        Condition::Lte(ref bound) => range_check(value, field, "$lte", bound, |o| o != Ordering::Greater),
        Condition::Gt(ref bound) => range_check(value, field, "$gt", bound, |o| o == Ordering::Greater),
        Condition::Lt(ref bound) => range_check(value, field, "$lt", bound, |o| o == Ordering::Less),
    }
}

/// Applies a range operator. Absent fields and mismatched types never match.
fn range_check<F>(value: Option<&Value>, field: &str, operator: &str, bound: &Value, accept: F) -> bool
where
    F: FnOnce(Ordering) -> bool,
{
    let Some(value) = value
    else {
        return false;
    };
    match compare_values(value, bound) {
        Some(ordering) => accept(ordering),
        None => {
            warn!(
                "{} on field '{}' compares {} against {}; treating as no match",
                operator, field, value, bound
            );
            false
        },
    }
}
