//! Document projection utilities.

use serde_json::Map;

use crate::{Document, ID_FIELD};

/// Projects a document to `_id` plus the listed fields.
///
/// Fields keep the order they have in the document. Listed fields the document lacks
/// are skipped. An empty list keeps only `_id`.
pub fn project_document(doc: &Document, fields: &[String]) -> Document {
    let projected: Map<_, _> = doc
        .fields()
        .iter()
        .filter(|&(key, _)| key == ID_FIELD || fields.iter().any(|f| f == key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Document::from(projected)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn create_doc(data: Value) -> Document { Document::from(data.as_object().unwrap().clone()) }

    #[test]
    fn test_project_keeps_id_and_listed_fields() {
        let doc = create_doc(json!({"_id": "c1", "brand": "BMW", "model": "X5", "price": 1}));
        let projected = project_document(&doc, &["price".to_owned(), "brand".to_owned()]);
        assert_eq!(
            Value::from(projected),
            json!({"_id": "c1", "brand": "BMW", "price": 1})
        );
    }

    #[test]
    fn test_project_skips_missing_fields() {
        let doc = create_doc(json!({"_id": "c1", "brand": "BMW"}));
        let projected = project_document(&doc, &["color".to_owned()]);
        assert_eq!(Value::from(projected), json!({"_id": "c1"}));
    }
}
