use std::io::ErrorKind;

use tokio::fs as tokio_fs;
use tracing::{debug, error, trace};

use crate::{Result, COLLECTION_EXTENSION};
use super::stor::Store;

#[allow(
    clippy::multiple_inherent_impl,
    reason = "multiple impl blocks for Store are intentional for organization"
)]
impl Store {
    /// Lists the collections that have a backing file, sorted by name.
    ///
    /// Only `<name>.json` files directly under the root count. A missing root
    /// directory yields an empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use showroom_store::Store;
    ///
    /// # async fn example() -> showroom_store::Result<()> {
    /// let store = Store::open("/tmp/showroom").await;
    /// store.collection("cars").insert_one(json!({"brand": "BMW"})).await?;
    ///
    /// let names = store.list_collections().await?;
    /// assert!(names.contains(&"cars".to_owned()));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        trace!("Listing collections under {:?}", self.root_path());
        let mut entries = match tokio_fs::read_dir(self.root_path()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store root {:?} does not exist, no collections", self.root_path());
                return Ok(Vec::new());
            },
            Err(e) => {
                error!("Failed to read store root {:?}: {}", self.root_path(), e);
                return Err(e.into());
            },
        };

        let mut collections = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            error!("Failed to read directory entry: {}", e);
            e
        })? {
            let path = entry.path();
            let is_collection_file = path
                .extension()
                .is_some_and(|ext| ext == COLLECTION_EXTENSION);
            if !is_collection_file {
                continue;
            }
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| {
                    error!("Failed to get file type for {:?}: {}", path, e);
                    e
                })?
                .is_file();
            if is_file && let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) {
                collections.push(name.to_owned());
            }
        }
        collections.sort();

        debug!("Found {} collections", collections.len());
        Ok(collections)
    }

    /// Deletes the backing file of a collection.
    ///
    /// Returns `false` when there was nothing to delete. Waits for in-flight
    /// mutations on the collection made through this store, then releases the
    /// collection's write lock if no handle still refers to it.
    pub async fn drop_collection(&self, name: &str) -> Result<bool> {
        trace!("Dropping collection '{}'", name);
        let lock = self.write_lock(name);
        let removed = {
            let _guard = lock.lock().await;
            self.remove_collection_file(name).await
        };
        drop(lock);
        self.release_write_lock(name);
        removed
    }

    async fn remove_collection_file(&self, name: &str) -> Result<bool> {
        let path = self.collection_path(name);
        match tokio_fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Collection '{}' dropped", name);
                Ok(true)
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Collection '{}' does not exist, nothing to drop", name);
                Ok(false)
            },
            Err(e) => {
                error!("Failed to delete collection file {:?}: {}", path, e);
                Err(e.into())
            },
        }
    }
}
