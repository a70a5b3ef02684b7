use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};

/// A schemaless record stored in a collection.
///
/// A document is a JSON object. Besides the caller's fields it carries three system
/// fields managed by the store: `_id`, `createdAt` and `updatedAt`. Field order is
/// preserved across load and save.
///
/// The store itself stays schema-agnostic; callers that want typed access project a
/// document into their own struct with [`Document::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

/// Returns the current time in the ISO-8601 form stored in `createdAt`/`updatedAt`.
pub fn timestamp_now() -> String { Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }

/// Generates a fresh collision-resistant document identifier.
pub fn new_document_id() -> String { cuid2::create_id() }

/// Returns `true` for the fields a caller can never set directly.
pub fn is_system_field(field: &str) -> bool {
    field == ID_FIELD || field == CREATED_AT_FIELD || field == UPDATED_AT_FIELD
}

impl Document {
    /// Builds a freshly inserted document.
    ///
    /// The caller's fields are copied first and the system fields applied afterwards,
    /// so an `_id` or timestamp supplied by the caller never survives.
    pub(crate) fn new_inserted(fields: &Map<String, Value>, id: String, now: &str) -> Self {
        let mut data = Map::with_capacity(fields.len().saturating_add(3));
        data.insert(ID_FIELD.to_owned(), Value::String(id));
        for (key, value) in fields {
            if !is_system_field(key) {
                data.insert(key.clone(), value.clone());
            }
        }
        data.insert(CREATED_AT_FIELD.to_owned(), Value::String(now.to_owned()));
        data.insert(UPDATED_AT_FIELD.to_owned(), Value::String(now.to_owned()));
        Self(data)
    }

    /// Shallow-merges `fields` into the document and refreshes `updatedAt`.
    ///
    /// `_id` and `createdAt` are immutable and silently kept.
    pub(crate) fn merge(&mut self, fields: &Map<String, Value>, now: &str) {
        for (key, value) in fields {
            if key != ID_FIELD && key != CREATED_AT_FIELD {
                self.0.insert(key.clone(), value.clone());
            }
        }
        self.0
            .insert(UPDATED_AT_FIELD.to_owned(), Value::String(now.to_owned()));
    }

    /// Returns the document identifier, if the document has a string `_id`.
    pub fn id(&self) -> Option<&str> { self.0.get(ID_FIELD).and_then(Value::as_str) }

    /// Returns the parsed `createdAt` timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> { self.timestamp(CREATED_AT_FIELD) }

    /// Returns the parsed `updatedAt` timestamp.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> { self.timestamp(UPDATED_AT_FIELD) }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> { self.0.get(field) }

    /// Returns all fields, system fields included.
    pub const fn fields(&self) -> &Map<String, Value> { &self.0 }

    /// Consumes the document and returns its fields.
    pub fn into_map(self) -> Map<String, Value> { self.0 }

    /// Deserializes the document into a caller-defined type.
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use serde_json::json;
    /// use showroom_store::Document;
    ///
    /// #[derive(Deserialize)]
    /// struct Car {
    ///     brand: String,
    ///     price: u64,
    /// }
    ///
    /// let doc = Document::from(json!({"brand": "Audi", "price": 4_100_000}).as_object().unwrap().clone());
    /// let car: Car = doc.parse().unwrap();
    /// assert_eq!(car.brand, "Audi");
    /// assert_eq!(car.price, 4_100_000);
    /// ```
    pub fn parse<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Ok(T::deserialize(Value::Object(self.0.clone()))?)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self { Self(map) }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self { Self::Object(doc.0) }
}
