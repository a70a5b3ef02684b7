use tracing::{debug, trace};

use crate::{Document, Pipeline, Result};
use super::coll::Collection;

#[allow(
    clippy::multiple_inherent_impl,
    reason = "multiple impl blocks for Collection are intentional for organization"
)]
impl Collection {
    /// Runs an aggregation pipeline over the whole collection.
    ///
    /// The collection is loaded once and the stages are applied left to right.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - Stages to apply; an empty pipeline returns every document
    ///
    /// # Returns
    ///
    /// The documents produced by the last stage. After a `$group` stage these are
    /// `{_id, count, items}` summaries rather than stored documents.
    ///
    /// # Example
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::{Pipeline, Store};
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// let cars = store.collection("cars");
    ///
    /// let per_brand = cars
    ///     .aggregate(&Pipeline::from_value(&json!([
    ///         {"$match": {"isNew": true}},
    ///         {"$group": {"_id": "$brand"}}
    ///     ]))?)
    ///     .await?;
    /// for group in &per_brand {
    ///     println!("{:?}: {:?}", group.get("_id"), group.get("count"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>> {
        trace!(
            "Aggregating '{}' through {} stages",
            self.name,
            pipeline.stages().len()
        );
        let docs = self.load().await?;
        let output = pipeline.execute(docs);
        debug!("Aggregation on '{}' produced {} documents", self.name, output.len());
        Ok(output)
    }
}
