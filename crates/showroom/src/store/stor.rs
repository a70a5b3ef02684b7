use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex as StdMutex, PoisonError},
};

use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::{debug, error, trace};

use crate::{Collection, StoreConfig, COLLECTION_EXTENSION};

/// The owner of the storage root and the factory for [`Collection`] handles.
///
/// A store is created once at process start and passed to whoever needs
/// collections; there is no process-wide instance. Cloning is cheap and every clone
/// shares the same per-collection write locks.
///
/// # Layout
///
/// - Root directory (given at open time)
///   - `cars.json`, `orders.json`, ... one JSON array per collection
///
/// # Examples
///
/// ```no_run
/// use showroom_store::Store;
///
/// # async fn example() {
/// let store = Store::open("/var/lib/showroom").await;
/// let users = store.collection("users");
/// assert_eq!(users.name(), "users");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    /// The effective configuration.
    config:      StoreConfig,
    /// One write lock per collection name, created on first use and released when
    /// the collection is dropped and no handle refers to it.
    write_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Store {
    /// Opens a store rooted at `root_path` with default settings.
    ///
    /// The root directory is created recursively if needed. A creation failure is
    /// logged and otherwise ignored: reads then see empty collections and writes
    /// report the underlying I/O error.
    ///
    /// # Parameters
    ///
    /// * `root_path` - Directory holding the collection files; anything implementing
    ///   `AsRef<Path>`
    pub async fn open<P>(root_path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self::open_with_config(StoreConfig::new(root_path)).await
    }

    /// Opens a store from an explicit configuration.
    ///
    /// ```no_run
    /// use showroom_store::{Store, StoreConfig};
    ///
    /// # async fn example() {
    /// let config = StoreConfig::new("/var/lib/showroom").with_atomic_writes(false);
    /// let store = Store::open_with_config(config).await;
    /// assert!(!store.config().atomic_writes);
    /// # }
    /// ```
    pub async fn open_with_config(config: StoreConfig) -> Self {
        trace!("Opening store at {:?}", config.root_path);
        match tokio_fs::create_dir_all(&config.root_path).await {
            Ok(()) => {
                debug!(
                    "Store root directory created or already exists: {:?}",
                    config.root_path
                );
            },
            Err(e) => {
                error!(
                    "Failed to create store root directory {:?}: {}",
                    config.root_path, e
                );
            },
        }
        Self {
            inner: Arc::new(StoreInner {
                config,
                write_locks: StdMutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns a handle on the collection called `name`.
    ///
    /// This does no I/O and accepts any name; the backing file is
    /// `<root>/<name>.json` and only appears once something is written.
    pub fn collection(&self, name: &str) -> Collection {
        trace!("Handing out collection '{}'", name);
        let config = &self.inner.config;
        Collection {
            name:          name.to_owned(),
            path:          self.collection_path(name),
            write_lock:    config.lock_writes.then(|| self.write_lock(name)),
            atomic_writes: config.atomic_writes,
        }
    }

    /// Returns the storage root.
    pub fn root_path(&self) -> &Path { &self.inner.config.root_path }

    /// Returns the configuration the store was opened with.
    pub fn config(&self) -> &StoreConfig { &self.inner.config }

    pub(crate) fn collection_path(&self, name: &str) -> PathBuf {
        self.root_path()
            .join(format!("{}.{}", name, COLLECTION_EXTENSION))
    }

    pub(crate) fn write_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .inner
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(name.to_owned()).or_default())
    }

    /// Forgets the write lock of `name` when no collection handle holds it.
    ///
    /// Entries still referenced elsewhere are kept so that every live handle keeps
    /// sharing one lock.
    pub(crate) fn release_write_lock(&self, name: &str) {
        let mut locks = self
            .inner
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(name)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(name);
            trace!("Released write lock of collection '{}'", name);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.inner
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
