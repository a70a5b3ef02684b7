use tracing::{debug, trace};

use crate::{
    filtering::matches,
    projection::project_document,
    sort::sort_documents,
    Document,
    Filter,
    FindOptions,
    Result,
};
use super::coll::Collection;

#[allow(
    clippy::multiple_inherent_impl,
    reason = "multiple impl blocks for Collection are intentional for organization"
)]
impl Collection {
    /// Returns every document matching `filter`, in collection order.
    ///
    /// # Arguments
    ///
    /// * `filter` - Conditions a document must all satisfy; an empty filter matches everything
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::{Filter, Store};
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// let cars = store.collection("cars");
    ///
    /// let new_bmws = cars
    ///     .find(&Filter::from_value(&json!({"brand": "BMW", "isNew": true}))?)
    ///     .await?;
    /// for car in &new_bmws {
    ///     println!("{:?}", car.get("model"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Document>> {
        trace!("Finding documents in '{}' with {:?}", self.name, filter);
        let docs = self.load().await?;
        let found: Vec<Document> = docs.into_iter().filter(|doc| matches(doc, filter)).collect();
        debug!("Found {} documents in '{}'", found.len(), self.name);
        Ok(found)
    }

    /// Returns the first document matching `filter`, if any.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Document>> {
        trace!("Finding one document in '{}' with {:?}", self.name, filter);
        let docs = self.load().await?;
        Ok(docs.into_iter().find(|doc| matches(doc, filter)))
    }

    /// Returns the document with the given `_id`, if any.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>> { self.find_one(&Filter::by_id(id)).await }

    /// Counts the documents matching `filter`.
    pub async fn count_documents(&self, filter: &Filter) -> Result<u64> {
        trace!("Counting documents in '{}' with {:?}", self.name, filter);
        let docs = self.load().await?;
        let count = docs.iter().filter(|doc| matches(doc, filter)).count();
        Ok(count as u64)
    }

    /// Finds documents, then sorts, skips, limits and projects them, in that order.
    ///
    /// ```rust
    /// use showroom_store::{Filter, FindOptions, SortSpec, Store};
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// let cars = store.collection("cars");
    ///
    /// let page = cars
    ///     .find_with_options(
    ///         &Filter::new().eq("brand", "BMW"),
    ///         &FindOptions::new()
    ///             .sort(SortSpec::new().desc("price"))
    ///             .skip(10)
    ///             .limit(10)
    ///             .projection(vec!["model", "price"]),
    ///     )
    ///     .await?;
    /// assert!(page.len() <= 10);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_with_options(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<Document>> {
        let mut docs = self.find(filter).await?;
        if let Some(ref sort) = options.sort {
            sort_documents(&mut docs, sort);
        }
        let docs = docs
            .into_iter()
            .skip(options.skip.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX));
        let docs: Vec<Document> = match options.projection {
            Some(ref fields) => docs.map(|doc| project_document(&doc, fields)).collect(),
            None => docs.collect(),
        };
        debug!(
            "Returning {} documents from '{}' after applying options",
            docs.len(),
            self.name
        );
        Ok(docs)
    }
}
