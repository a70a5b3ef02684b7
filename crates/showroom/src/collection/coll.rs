use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    fs as tokio_fs,
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, error, trace, warn};

use crate::{Document, Result, TEMP_SUFFIX};

/// A named, file-backed sequence of documents.
///
/// A collection maps to exactly one file, `<root>/<name>.json`, holding a JSON array
/// of documents in insertion order. The handle itself is a stateless façade: it
/// caches nothing, and every operation reads the file afresh. Mutations load the
/// whole array, change it in memory and write it back.
///
/// A collection whose file does not exist behaves as empty. The file is created by
/// the first mutation that saves, never by a read.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use showroom_store::{Filter, Store, Update};
///
/// # async fn example() -> showroom_store::Result<()> {
/// let store = Store::open("/tmp/showroom").await;
/// let cars = store.collection("cars");
///
/// let car = cars
///     .insert_one(json!({"brand": "Audi", "model": "A6", "status": "available"}))
///     .await?;
/// let id = car.id().unwrap_or_default().to_owned();
///
/// cars.update_by_id(&id, &Update::from_value(&json!({"$set": {"status": "sold"}}))?)
///     .await?;
///
/// let sold = cars.count_documents(&Filter::new().eq("status", "sold")).await?;
/// assert_eq!(sold, 1);
/// # Ok(())
/// # }
/// ```
///
/// # Concurrency
///
/// Handles obtained from the same [`Store`](crate::Store) for the same name share a
/// write lock, held across each load-modify-save cycle. Reads never take it.
#[allow(
    clippy::field_scoped_visibility_modifiers,
    reason = "fields are set by the store when handing out collections"
)]
#[derive(Debug, Clone)]
pub struct Collection {
    /// The collection name.
    pub(crate) name:          String,
    /// Path of the backing file.
    pub(crate) path:          PathBuf,
    /// Lock serializing mutations, absent when write locking is disabled.
    pub(crate) write_lock:    Option<Arc<Mutex<()>>>,
    /// Whether saves go through a temporary file and a rename.
    pub(crate) atomic_writes: bool,
}

impl Collection {
    /// Returns the name of the collection.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path { &self.path }

    /// Reads every document of the collection.
    ///
    /// A missing file, or a root that is missing or not a directory, yields an empty
    /// vector. Any other read failure, or content that is not a JSON array of
    /// objects, is returned as an error.
    pub async fn load(&self) -> Result<Vec<Document>> {
        trace!("Loading collection '{}' from {:?}", self.name, self.path);
        let content = match tokio_fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                debug!("Collection file {:?} not found, treating as empty", self.path);
                return Ok(Vec::new());
            },
            Err(e) => {
                error!("Failed to read collection file {:?}: {}", self.path, e);
                return Err(e.into());
            },
        };
        let docs: Vec<Document> = serde_json::from_slice(&content).map_err(|e| {
            error!("Failed to parse collection file {:?}: {}", self.path, e);
            e
        })?;
        debug!("Loaded {} documents from '{}'", docs.len(), self.name);
        Ok(docs)
    }

    /// Replaces the collection file with `docs`, pretty-printed with 2-space indentation.
    pub async fn save(&self, docs: &[Document]) -> Result<()> {
        trace!("Saving {} documents to '{}'", docs.len(), self.name);
        let content = serde_json::to_vec_pretty(docs).map_err(|e| {
            error!("Failed to serialize collection '{}': {}", self.name, e);
            e
        })?;

        if self.atomic_writes {
            let temp_path = self.temp_path();
            tokio_fs::write(&temp_path, &content).await.map_err(|e| {
                error!("Failed to write temporary file {:?}: {}", temp_path, e);
                e
            })?;
            if let Err(e) = tokio_fs::rename(&temp_path, &self.path).await {
                error!(
                    "Failed to move {:?} over {:?}: {}",
                    temp_path, self.path, e
                );
                if let Err(cleanup) = tokio_fs::remove_file(&temp_path).await {
                    warn!("Failed to remove temporary file {:?}: {}", temp_path, cleanup);
                }
                return Err(e.into());
            }
        }
        else {
            tokio_fs::write(&self.path, &content).await.map_err(|e| {
                error!("Failed to write collection file {:?}: {}", self.path, e);
                e
            })?;
        }
        debug!("Collection '{}' saved to {:?}", self.name, self.path);
        Ok(())
    }

    /// `<name>.json.<id>.tmp`, next to the collection file. Unique per save.
    fn temp_path(&self) -> PathBuf {
        let mut path = OsString::from(self.path.as_os_str());
        path.push(".");
        path.push(cuid2::create_id());
        path.push(".");
        path.push(TEMP_SUFFIX);
        PathBuf::from(path)
    }

    /// Takes the collection's write lock for one load-modify-save cycle.
    pub(crate) async fn lock_for_write(&self) -> Option<MutexGuard<'_, ()>> {
        match self.write_lock {
            Some(ref lock) => Some(lock.lock().await),
            None => None,
        }
    }
}
