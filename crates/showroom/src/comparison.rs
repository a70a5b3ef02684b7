//! Equality, ordering and string-form rules shared by the matcher and the sorter.
//!
//! Values are compared the way the web layer's stored data expects: numbers
//! numerically, strings by UTF-16 code units, booleans with `false < true`. Values of
//! different JSON types are never coerced into each other; [`compare_values`] reports
//! them as incomparable and callers decide how to surface that.

use std::cmp::Ordering;

use serde_json::{Number, Value};

/// Strict equality between two JSON values.
///
/// Numbers are equal when they denote the same numeric value (`1 == 1.0`). Arrays
/// compare element-wise and objects key-by-key regardless of key order.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        },
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() &&
                x.iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| values_equal(l, r)))
        },
        _ => false,
    }
}

/// Equality between a possibly absent document field and a literal.
///
/// An absent field never equals anything, not even `null`.
pub fn field_equals(field: Option<&Value>, literal: &Value) -> bool {
    field.is_some_and(|value| values_equal(value, literal))
}

/// Orders two values of the same scalar type.
///
/// Returns `None` when the values have different types or are not ordered scalars
/// (`null`, arrays, objects).
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Some(compare_numbers(x, y)),
        (Value::String(x), Value::String(y)) => Some(x.encode_utf16().cmp(y.encode_utf16())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Orders two optional values.
///
/// An absent side is incomparable, like a type mismatch.
pub fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Option<Ordering> {
    match (a, b) {
        (Some(x), Some(y)) => compare_values(x, y),
        _ => None,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// Renders a field the way `$regex` sees it.
///
/// Absent fields render as `undefined`, objects as `[object Object]`, arrays as the
/// comma-joined forms of their elements (with `null` elements rendering empty).
pub fn string_form(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_owned(),
        Some(Value::Null) => "null".to_owned(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number_form(n),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => {
            items
                .iter()
                .map(|item| {
                    match *item {
                        Value::Null => String::new(),
                        _ => string_form(Some(item)),
                    }
                })
                .collect::<Vec<_>>()
                .join(",")
        },
        Some(Value::Object(_)) => "[object Object]".to_owned(),
    }
}

fn number_form(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64()
    else {
        return n.to_string();
    };
    if f.abs() >= 1e21 {
        let exp = format!("{:e}", f);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    if f.fract() == 0.0 {
        return format!("{:.0}", f);
    }
    f.to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_values_equal_scalars() {
        assert!(values_equal(&json!("BMW"), &json!("BMW")));
        assert!(!values_equal(&json!("BMW"), &json!("bmw")));
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(values_equal(&json!(null), &json!(null)));
        assert!(!values_equal(&json!(false), &json!(0)));
    }

    #[test]
    fn test_values_equal_structures() {
        assert!(values_equal(&json!([1, "a"]), &json!([1.0, "a"])));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(values_equal(
            &json!({"a": 1, "b": [true]}),
            &json!({"b": [true], "a": 1})
        ));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_field_equals_absent_never_matches() {
        assert!(!field_equals(None, &json!(null)));
        assert!(!field_equals(None, &json!("x")));
        assert!(field_equals(Some(&json!("x")), &json!("x")));
    }

    #[test]
    fn test_compare_values_same_type() {
        assert_eq!(compare_values(&json!(1), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(-3), &json!(u64::MAX)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("Audi"), &json!("BMW")), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("B")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!(false), &json!(true)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("x"), &json!("x")), Some(Ordering::Equal));
    }

    #[test]
    fn test_compare_values_mixed_types_are_incomparable() {
        assert_eq!(compare_values(&json!("10"), &json!(9)), None);
        assert_eq!(compare_values(&json!(null), &json!(0)), None);
        assert_eq!(compare_values(&json!(true), &json!(1)), None);
        assert_eq!(compare_values(&json!([1]), &json!([1])), None);
        assert_eq!(compare_values(&json!({}), &json!({})), None);
    }

    #[test]
    fn test_compare_fields_absent_is_incomparable() {
        assert_eq!(compare_fields(None, Some(&json!(1))), None);
        assert_eq!(compare_fields(None, None), None);
        assert_eq!(
            compare_fields(Some(&json!(1)), Some(&json!(1))),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_string_form() {
        assert_eq!(string_form(None), "undefined");
        assert_eq!(string_form(Some(&json!(null))), "null");
        assert_eq!(string_form(Some(&json!(true))), "true");
        assert_eq!(string_form(Some(&json!(3000000))), "3000000");
        assert_eq!(string_form(Some(&json!(1.5))), "1.5");
        assert_eq!(string_form(Some(&json!(2.0))), "2");
        assert_eq!(string_form(Some(&json!(1e21))), "1e+21");
        assert_eq!(string_form(Some(&json!("X5"))), "X5");
        assert_eq!(string_form(Some(&json!(["a", 1, null, true]))), "a,1,,true");
        assert_eq!(string_form(Some(&json!({"a": 1}))), "[object Object]");
    }
}
