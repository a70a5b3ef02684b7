use serde_json::{Map, Value};
use tracing::{debug, error, trace};

use crate::{
    document::{new_document_id, timestamp_now},
    filtering::matches,
    DeleteResult,
    Document,
    Filter,
    Result,
    StoreError,
    Update,
    UpdateResult,
};
use super::coll::Collection;

#[allow(
    clippy::multiple_inherent_impl,
    reason = "multiple impl blocks for Collection are intentional for organization"
)]
impl Collection {
    /// Inserts a new document and returns it as stored.
    ///
    /// The document receives a fresh `_id` and `createdAt == updatedAt == now`. The
    /// system fields are applied after the caller's fields, so values the caller
    /// supplies for them are discarded.
    ///
    /// # Arguments
    ///
    /// * `fields` - The caller's fields; must be a JSON object
    ///
    /// # Returns
    ///
    /// The stored document, or [`StoreError::InvalidDocument`] when `fields` is not an
    /// object. Nothing is written in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::Store;
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// let car = store
    ///     .collection("cars")
    ///     .insert_one(json!({"brand": "BMW", "model": "X5", "price": 5_200_000}))
    ///     .await?;
    /// assert!(car.id().is_some());
    /// assert_eq!(car.created_at(), car.updated_at());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn insert_one(&self, fields: Value) -> Result<Document> {
        trace!("Inserting one document into '{}'", self.name);
        let fields = as_object(&fields, &self.name)?;

        let _guard = self.lock_for_write().await;
        let mut docs = self.load().await?;
        let doc = Document::new_inserted(fields, new_document_id(), &timestamp_now());
        docs.push(doc.clone());
        self.save(&docs).await?;
        debug!("Inserted document {:?} into '{}'", doc.id(), self.name);
        Ok(doc)
    }

    /// Inserts several documents with a single load and save.
    ///
    /// Every element must be a JSON object; if any is not, the whole batch is rejected
    /// before anything is written. All documents of the batch share one timestamp.
    pub async fn insert_many(&self, items: Vec<Value>) -> Result<Vec<Document>> {
        trace!("Inserting {} documents into '{}'", items.len(), self.name);
        let batch = items
            .iter()
            .map(|item| as_object(item, &self.name))
            .collect::<Result<Vec<_>>>()?;
        if batch.is_empty() {
            debug!("Empty batch for '{}', nothing to insert", self.name);
            return Ok(Vec::new());
        }

        let _guard = self.lock_for_write().await;
        let mut docs = self.load().await?;
        let now = timestamp_now();
        let inserted: Vec<Document> = batch
            .into_iter()
            .map(|fields| Document::new_inserted(fields, new_document_id(), &now))
            .collect();
        docs.extend(inserted.iter().cloned());
        self.save(&docs).await?;
        debug!("Inserted {} documents into '{}'", inserted.len(), self.name);
        Ok(inserted)
    }

    /// Shallow-merges `update` into the first document matching `filter`.
    ///
    /// `_id` and `createdAt` are never changed; `updatedAt` is refreshed. When
    /// nothing matches, the result is `{0, 0}` and the file is left untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::{Filter, Store, Update};
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// let orders = store.collection("orders");
    ///
    /// let result = orders
    ///     .update_one(
    ///         &Filter::new().eq("number", "A-1001"),
    ///         &Update::from_value(&json!({"$set": {"status": "paid"}}))?,
    ///     )
    ///     .await?;
    /// println!("matched {}", result.matched_count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_one(&self, filter: &Filter, update: &Update) -> Result<UpdateResult> {
        trace!("Updating one document in '{}' with {:?}", self.name, filter);
        let _guard = self.lock_for_write().await;
        let mut docs = self.load().await?;
        let Some(doc) = docs.iter_mut().find(|doc| matches(doc, filter))
        else {
            debug!("No document in '{}' matched the update filter", self.name);
            return Ok(UpdateResult::none());
        };
        doc.merge(update.fields(), &timestamp_now());
        debug!("Updated document {:?} in '{}'", doc.id(), self.name);
        self.save(&docs).await?;
        Ok(UpdateResult::one())
    }

    /// Updates the document with the given `_id`.
    pub async fn update_by_id(&self, id: &str, update: &Update) -> Result<UpdateResult> {
        self.update_one(&Filter::by_id(id), update).await
    }

    /// Removes the first document matching `filter`.
    pub async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult> {
        trace!("Deleting one document from '{}' with {:?}", self.name, filter);
        let _guard = self.lock_for_write().await;
        let mut docs = self.load().await?;
        let Some(position) = docs.iter().position(|doc| matches(doc, filter))
        else {
            debug!("No document in '{}' matched the delete filter", self.name);
            return Ok(DeleteResult::default());
        };
        let removed = docs.remove(position);
        self.save(&docs).await?;
        debug!("Deleted document {:?} from '{}'", removed.id(), self.name);
        Ok(DeleteResult {
            deleted_count: 1,
        })
    }

    /// Removes the document with the given `_id`.
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteResult> { self.delete_one(&Filter::by_id(id)).await }

    /// Removes every document matching `filter` in one pass.
    ///
    /// The file is only rewritten when at least one document was removed.
    pub async fn delete_many(&self, filter: &Filter) -> Result<DeleteResult> {
        trace!("Deleting documents from '{}' with {:?}", self.name, filter);
        let _guard = self.lock_for_write().await;
        let mut docs = self.load().await?;
        let before = docs.len();
        docs.retain(|doc| !matches(doc, filter));
        let deleted = before.saturating_sub(docs.len());
        if deleted > 0 {
            self.save(&docs).await?;
        }
        debug!("Deleted {} documents from '{}'", deleted, self.name);
        Ok(DeleteResult {
            deleted_count: deleted as u64,
        })
    }
}

fn as_object<'v>(value: &'v Value, collection: &str) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        error!(
            "Rejected non-object document for '{}': {}",
            collection, value
        );
        StoreError::InvalidDocument {
            reason: format!("documents must be JSON objects, got {}", value),
        }
    })
}
