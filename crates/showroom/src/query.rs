use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::{sort::SortSpec, Result, StoreError, ID_FIELD};

/// Operator keys in the order they are looked up in an operator object.
///
/// Only the first one present is applied; the rest of the object is ignored.
const OPERATOR_PRECEDENCE: [&str; 7] = ["$regex", "$in", "$gte", "$lte", "$gt", "$lt", "$ne"];

/// A condition on a single document field.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Field is strictly equal to the value
    Equals(Value),
    /// String form of the field matches the expression
    Regex(RegexCondition),
    /// Field equals one of the values
    In(Vec<Value>),
    /// Field is greater than or equal to the value
    Gte(Value),
    /// Field is less than or equal to the value
    Lte(Value),
    /// Field is greater than the value
    Gt(Value),
    /// Field is less than the value
    Lt(Value),
    /// Field is not strictly equal to the value
    Ne(Value),
}

/// A compiled `$regex` condition together with its source.
#[derive(Debug, Clone)]
pub struct RegexCondition {
    /// The pattern as written in the filter
    pub pattern: String,
    /// The `$options` flags as written in the filter
    pub options: String,
    regex:       Regex,
}

impl RegexCondition {
    /// Compiles `pattern` with the given flag string.
    ///
    /// Recognized flags are `i` (case-insensitive), `m` (multi-line) and `s` (dot
    /// matches newline). `g`, `u` and `y` are accepted and have no effect here.
    pub fn new(field: &str, pattern: &str, options: &str) -> Result<Self> {
        let mut builder = RegexBuilder::new(pattern);
        for flag in options.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                },
                'm' => {
                    builder.multi_line(true);
                },
                's' => {
                    builder.dot_matches_new_line(true);
                },
                'g' | 'u' | 'y' => {},
                other => {
                    return Err(StoreError::InvalidFilter {
                        field:  field.to_owned(),
                        reason: format!("unsupported $options flag '{}'", other),
                    });
                },
            }
        }
        let regex = builder.build().map_err(|e| {
            error!("Failed to compile $regex '{}' on field '{}': {}", pattern, field, e);
            StoreError::InvalidRegex {
                pattern: pattern.to_owned(),
                source:  e,
            }
        })?;
        Ok(Self {
            pattern: pattern.to_owned(),
            options: options.to_owned(),
            regex,
        })
    }

    /// Tests the expression against a rendered field.
    pub fn is_match(&self, haystack: &str) -> bool { self.regex.is_match(haystack) }
}

/// A query filter: field conditions combined with AND.
///
/// Filters are usually parsed from the JSON form the web layer sends:
///
/// ```rust
/// use serde_json::json;
/// use showroom_store::Filter;
///
/// let filter = Filter::from_value(&json!({
///     "brand": "BMW",
///     "price": {"$gte": 3_000_000},
///     "model": {"$regex": "^x", "$options": "i"}
/// }))
/// .unwrap();
/// assert_eq!(filter.conditions().len(), 3);
/// ```
///
/// or built directly:
///
/// ```rust
/// use showroom_store::Filter;
///
/// let filter = Filter::new().eq("brand", "BMW").gte("price", 3_000_000);
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    /// Creates an empty filter, which matches every document.
    pub const fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Filter selecting a document by `_id`.
    pub fn by_id(id: &str) -> Self { Self::new().eq(ID_FIELD, id) }

    /// Parses the JSON filter grammar.
    ///
    /// `null` is accepted as the empty filter. An operator object that contains none
    /// of the recognized operators imposes no constraint on its field.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match *value {
            Value::Null => return Ok(Self::new()),
            Value::Object(ref map) => map,
            Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                return Err(StoreError::InvalidFilter {
                    field:  String::new(),
                    reason: "filter must be a JSON object".to_owned(),
                });
            },
        };

        let mut filter = Self::new();
        for (field, spec) in map {
            match *spec {
                Value::Object(ref operators) => {
                    if let Some(condition) = parse_operators(field, operators)? {
                        filter.conditions.push((field.clone(), condition));
                    }
                    else {
                        debug!("No recognized operator for field '{}', ignoring", field);
                    }
                },
                _ => filter.conditions.push((field.clone(), Condition::Equals(spec.clone()))),
            }
        }
        Ok(filter)
    }

    /// Appends an arbitrary condition.
    #[must_use]
    pub fn condition(mut self, field: &str, condition: Condition) -> Self {
        self.conditions.push((field.to_owned(), condition));
        self
    }

    /// Field equals `value`.
    #[must_use]
    pub fn eq<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Equals(value.into())) }

    /// Field differs from `value`.
    #[must_use]
    pub fn ne<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Ne(value.into())) }

    /// Field is one of `values`.
    #[must_use]
    pub fn is_in(self, field: &str, values: Vec<Value>) -> Self { self.condition(field, Condition::In(values)) }

    /// Field is greater than or equal to `value`.
    #[must_use]
    pub fn gte<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Gte(value.into())) }

    /// Field is less than or equal to `value`.
    #[must_use]
    pub fn lte<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Lte(value.into())) }

    /// Field is greater than `value`.
    #[must_use]
    pub fn gt<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Gt(value.into())) }

    /// Field is less than `value`.
    #[must_use]
    pub fn lt<V: Into<Value>>(self, field: &str, value: V) -> Self { self.condition(field, Condition::Lt(value.into())) }

    /// String form of the field matches `pattern` compiled with `options`.
    pub fn regex(self, field: &str, pattern: &str, options: &str) -> Result<Self> {
        let condition = RegexCondition::new(field, pattern, options)?;
        Ok(self.condition(field, Condition::Regex(condition)))
    }

    /// Returns the conditions in declaration order.
    pub fn conditions(&self) -> &[(String, Condition)] { &self.conditions }

    /// Returns `true` when the filter matches every document.
    pub fn is_empty(&self) -> bool { self.conditions.is_empty() }
}

impl TryFrom<&Value> for Filter {
    type Error = StoreError;

    fn try_from(value: &Value) -> Result<Self> { Self::from_value(value) }
}

fn parse_operators(field: &str, operators: &Map<String, Value>) -> Result<Option<Condition>> {
    let Some((operator, operand)) = OPERATOR_PRECEDENCE
        .iter()
        .find_map(|op| operators.get(*op).map(|operand| (*op, operand)))
    else {
        return Ok(None);
    };

    let condition = match operator {
        "$regex" => {
            let pattern = operand.as_str().ok_or_else(|| {
                StoreError::InvalidFilter {
                    field:  field.to_owned(),
                    reason: "$regex expects a string pattern".to_owned(),
                }
            })?;
            let options = match operators.get("$options") {
                None => "",
                Some(Value::String(options)) => options.as_str(),
                Some(_) => {
                    return Err(StoreError::InvalidFilter {
                        field:  field.to_owned(),
                        reason: "$options expects a string of flags".to_owned(),
                    });
                },
            };
            Condition::Regex(RegexCondition::new(field, pattern, options)?)
        },
        "$in" => {
            let values = operand.as_array().ok_or_else(|| {
                StoreError::InvalidFilter {
                    field:  field.to_owned(),
                    reason: "$in expects an array".to_owned(),
                }
            })?;
            Condition::In(values.clone())
        },
        "$gte" => Condition::Gte(operand.clone()),
        "$lte" => Condition::Lte(operand.clone()),
        "$gt" => Condition::Gt(operand.clone()),
        "$lt" => Condition::Lt(operand.clone()),
        _ => Condition::Ne(operand.clone()),
    };
    Ok(Some(condition))
}

/// Options applied after filtering in
/// [`Collection::find_with_options`](crate::Collection::find_with_options).
///
/// Order of application: sort, skip, limit, projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Optional sort specification
    pub sort:       Option<SortSpec>,
    /// Number of results to skip
    pub skip:       Option<usize>,
    /// Maximum number of results
    pub limit:      Option<usize>,
    /// Fields to keep (`_id` is always kept)
    pub projection: Option<Vec<String>>,
}

impl FindOptions {
    /// Creates options that leave the result untouched.
    pub const fn new() -> Self {
        Self {
            sort:       None,
            skip:       None,
            limit:      None,
            projection: None,
        }
    }

    /// Sorts the matching documents.
    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Skips the first `skip` documents.
    #[must_use]
    pub const fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Returns at most `limit` documents.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keeps only the listed fields.
    #[must_use]
    pub fn projection(mut self, fields: Vec<&str>) -> Self {
        self.projection = Some(fields.into_iter().map(ToOwned::to_owned).collect());
        self
    }
}
