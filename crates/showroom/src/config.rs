//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs as tokio_fs;
use tracing::{debug, error, trace};

use crate::{Result, StoreError, DEFAULT_STORE_ROOT};

/// Configuration for a [`Store`](crate::Store).
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes:
///
/// ```json
/// { "root_path": "/var/lib/showroom", "lock_writes": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one `<name>.json` file per collection
    pub root_path:     PathBuf,
    /// Serialize load-modify-save cycles per collection within this store
    pub lock_writes:   bool,
    /// Write to a temporary sibling file and rename it over the collection file
    pub atomic_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_path:     PathBuf::from(DEFAULT_STORE_ROOT),
            lock_writes:   true,
            atomic_writes: true,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration rooted at `root_path` with default settings.
    pub fn new<P>(root_path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Disables or enables the per-collection write lock.
    #[must_use]
    pub const fn with_lock_writes(mut self, lock_writes: bool) -> Self {
        self.lock_writes = lock_writes;
        self
    }

    /// Disables or enables temp-file-and-rename saves.
    #[must_use]
    pub const fn with_atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing keys fall back to their defaults. An unreadable file or invalid JSON
    /// is reported as [`StoreError::Config`].
    pub async fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        trace!("Loading store configuration from {:?}", path);
        let content = tokio_fs::read_to_string(path).await.map_err(|e| {
            error!("Failed to read configuration file {:?}: {}", path, e);
            StoreError::Config {
                message: format!("cannot read {}: {}", path.display(), e),
            }
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse configuration file {:?}: {}", path, e);
            StoreError::Config {
                message: format!("cannot parse {}: {}", path.display(), e),
            }
        })?;
        debug!("Store configuration loaded: {:?}", config);
        Ok(config)
    }
}
