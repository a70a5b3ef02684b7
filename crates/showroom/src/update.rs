use serde_json::{Map, Value};

use crate::{Result, StoreError, SET_OPERATOR};

/// The second argument of an update.
///
/// Both forms shallow-merge their fields onto the matched document; they differ only
/// in how the JSON argument is spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A plain object, merged as-is
    Replace(Map<String, Value>),
    /// `{"$set": {...}}`, merging the inner object
    Set(Map<String, Value>),
}

impl Update {
    /// Parses an update argument.
    ///
    /// An object carrying `$set` is a [`Update::Set`]; any other object is taken
    /// entirely as the field mapping.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::Update;
    ///
    /// let update = Update::from_value(&json!({"$set": {"price": 3_900_000}})).unwrap();
    /// assert_eq!(update.fields().get("price"), Some(&json!(3_900_000)));
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            StoreError::InvalidUpdate {
                reason: format!("update must be a JSON object, got {}", value),
            }
        })?;
        match map.get(SET_OPERATOR) {
            Some(Value::Object(fields)) => Ok(Self::Set(fields.clone())),
            Some(other) => {
                Err(StoreError::InvalidUpdate {
                    reason: format!("{} expects an object, got {}", SET_OPERATOR, other),
                })
            },
            None => Ok(Self::Replace(map.clone())),
        }
    }

    /// Shorthand for a `$set` update.
    pub const fn set(fields: Map<String, Value>) -> Self { Self::Set(fields) }

    /// Returns the fields to merge.
    pub const fn fields(&self) -> &Map<String, Value> {
        match *self {
            Self::Replace(ref fields) | Self::Set(ref fields) => fields,
        }
    }
}

impl TryFrom<&Value> for Update {
    type Error = StoreError;

    fn try_from(value: &Value) -> Result<Self> { Self::from_value(value) }
}

impl From<Map<String, Value>> for Update {
    fn from(fields: Map<String, Value>) -> Self { Self::Replace(fields) }
}
