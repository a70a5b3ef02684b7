//! Multi-key document ordering.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::{trace, warn};

use crate::{comparison::compare_values, Document, Result, StoreError};

/// Direction of a single sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order
    Ascending,
    /// Descending order
    Descending,
}

impl SortDirection {
    /// Interprets a JSON direction: `1` is ascending, anything else descending.
    pub fn from_value(value: &Value) -> Self {
        if value.as_f64() == Some(1.0) {
            Self::Ascending
        }
        else {
            Self::Descending
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Ordered list of `(field, direction)` keys.
///
/// Earlier keys take precedence; later keys only break ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<(String, SortDirection)>,
}

impl SortSpec {
    /// Creates an empty specification, which leaves the order untouched.
    pub const fn new() -> Self {
        Self {
            keys: Vec::new(),
        }
    }

    /// Parses `{"brand": 1, "price": -1}`, keeping the key order of the object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            StoreError::InvalidSort {
                reason: format!("expected an object of field directions, got {}", value),
            }
        })?;
        Ok(Self {
            keys: map
                .iter()
                .map(|(field, direction)| (field.clone(), SortDirection::from_value(direction)))
                .collect(),
        })
    }

    /// Adds an ascending key.
    #[must_use]
    pub fn asc(mut self, field: &str) -> Self {
        self.keys.push((field.to_owned(), SortDirection::Ascending));
        self
    }

    /// Adds a descending key.
    #[must_use]
    pub fn desc(mut self, field: &str) -> Self {
        self.keys.push((field.to_owned(), SortDirection::Descending));
        self
    }

    /// Returns the keys in precedence order.
    pub fn keys(&self) -> &[(String, SortDirection)] { &self.keys }

    /// Returns `true` when there is nothing to sort by.
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    /// Compares two documents, counting key comparisons between mismatched types.
    ///
    /// Absent fields and mismatched types compare as a tie on that key.
    pub fn compare(&self, a: &Document, b: &Document, mixed: &mut usize) -> Ordering {
        for (field, direction) in &self.keys {
            let (Some(left), Some(right)) = (a.get(field), b.get(field))
            else {
                continue;
            };
            match compare_values(left, right) {
                Some(Ordering::Equal) => {},
                Some(ordering) => return direction.apply(ordering),
                None => {
                    *mixed = mixed.saturating_add(1);
                },
            }
        }
        Ordering::Equal
    }
}

/// Sorts documents by `spec`. Ties keep their input order.
///
/// The comparator is not a total order once absent fields or mixed types are
/// involved, so this uses its own merge sort rather than `slice::sort_by`, which may
/// panic on inconsistent comparators.
pub fn sort_documents(docs: &mut Vec<Document>, spec: &SortSpec) {
    if spec.is_empty() {
        return;
    }
    trace!("Sorting {} documents by {:?}", docs.len(), spec.keys());
    let mut mixed = 0usize;
    let items = std::mem::take(docs);
    *docs = merge_sort(items, &mut |a, b| spec.compare(a, b, &mut mixed));
    if mixed > 0 {
        warn!(
            "Sort by {:?} compared values of different types {} time(s); those pairs were left unordered",
            spec.keys(),
            mixed
        );
    }
}

fn merge_sort<T, F>(mut items: Vec<T>, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare);
    let right = merge_sort(right, compare);

    let mut merged = Vec::with_capacity(left.len().saturating_add(right.len()));
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        // Left wins ties, which keeps the sort stable.
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(r, l) == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    merged
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document { Document::from(value.as_object().unwrap().clone()) }

    fn names(docs: &[Document]) -> Vec<&str> {
        docs.iter()
            .map(|d| d.get("name").and_then(Value::as_str).unwrap())
            .collect()
    }

    #[test]
    fn test_direction_from_value() {
        assert_eq!(SortDirection::from_value(&json!(1)), SortDirection::Ascending);
        assert_eq!(SortDirection::from_value(&json!(1.0)), SortDirection::Ascending);
        assert_eq!(SortDirection::from_value(&json!(-1)), SortDirection::Descending);
        assert_eq!(SortDirection::from_value(&json!("asc")), SortDirection::Descending);
        assert_eq!(SortDirection::from_value(&json!(0)), SortDirection::Descending);
    }

    #[test]
    fn test_from_value_keeps_key_order() {
        let spec = SortSpec::from_value(&json!({"price": -1, "brand": 1})).unwrap();
        assert_eq!(
            spec.keys(),
            &[
                ("price".to_owned(), SortDirection::Descending),
                ("brand".to_owned(), SortDirection::Ascending)
            ]
        );
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(matches!(
            SortSpec::from_value(&json!(["brand"])),
            Err(StoreError::InvalidSort { .. })
        ));
    }

    #[test]
    fn test_brand_ascending_then_price_descending() {
        let mut docs = vec![
            doc(json!({"name": "a", "brand": "BMW", "price": 10})),
            doc(json!({"name": "b", "brand": "Audi", "price": 5})),
            doc(json!({"name": "c", "brand": "BMW", "price": 30})),
            doc(json!({"name": "d", "brand": "Audi", "price": 7})),
            doc(json!({"name": "e", "brand": "BMW", "price": 20})),
        ];
        sort_documents(&mut docs, &SortSpec::new().asc("brand").desc("price"));
        assert_eq!(names(&docs), vec!["d", "b", "c", "e", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut docs = vec![
            doc(json!({"name": "first", "brand": "BMW"})),
            doc(json!({"name": "second", "brand": "BMW"})),
            doc(json!({"name": "third", "brand": "Audi"})),
        ];
        sort_documents(&mut docs, &SortSpec::new().asc("brand"));
        assert_eq!(names(&docs), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_mixed_types_fall_through_to_next_key() {
        let a = doc(json!({"name": "a", "price": "cheap", "year": 2020}));
        let b = doc(json!({"name": "b", "price": 100, "year": 2019}));
        let spec = SortSpec::new().asc("price").asc("year");
        let mut mixed = 0;
        assert_eq!(spec.compare(&a, &b, &mut mixed), Ordering::Greater);
        assert_eq!(mixed, 1);
    }

    #[test]
    fn test_absent_field_is_a_tie_without_counting() {
        let a = doc(json!({"name": "a"}));
        let b = doc(json!({"name": "b", "price": 1}));
        let mut mixed = 0;
        assert_eq!(
            SortSpec::new().asc("price").compare(&a, &b, &mut mixed),
            Ordering::Equal
        );
        assert_eq!(mixed, 0);
    }

    #[test]
    fn test_inconsistent_comparisons_do_not_panic() {
        let mut docs: Vec<Document> = (0..64)
            .map(|i| {
                match i % 4 {
                    0 => doc(json!({"name": "n", "v": i})),
                    1 => doc(json!({"name": "s", "v": format!("{}", i)})),
                    2 => doc(json!({"name": "x"})),
                    _ => doc(json!({"name": "b", "v": i % 2 == 0})),
                }
            })
            .collect();
        sort_documents(&mut docs, &SortSpec::new().desc("v"));
        assert_eq!(docs.len(), 64);
    }

    #[test]
    fn test_empty_spec_is_noop() {
        let mut docs = vec![doc(json!({"name": "z"})), doc(json!({"name": "a"}))];
        sort_documents(&mut docs, &SortSpec::new());
        assert_eq!(names(&docs), vec!["z", "a"]);
    }
}
