//! Showroom is a small embedded document store.
//!
//! Every collection lives in a single `<name>.json` file under the store root and
//! holds a JSON array of documents. Each operation loads the whole file, applies
//! the query, sort or pipeline logic in memory and, for mutations, writes the full
//! array back.
//!
//! ```no_run
//! use showroom_store::{Filter, Store};
//! use serde_json::json;
//!
//! # async fn example() -> showroom_store::Result<()> {
//! let store = Store::open("/var/lib/showroom").await;
//! let cars = store.collection("cars");
//!
//! cars.insert_one(json!({"brand": "BMW", "model": "X5", "price": 5_200_000}))
//!     .await?;
//!
//! let premium = cars
//!     .find(&Filter::from_value(&json!({"price": {"$gte": 3_000_000}}))?)
//!     .await?;
//! assert_eq!(premium.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod filtering;
pub mod pipeline;
pub mod projection;
pub mod query;
pub mod results;
pub mod sort;
pub mod store;
pub mod update;

pub use collection::Collection;
pub use config::StoreConfig;
pub use constants::*;
pub use document::Document;
pub use error::{Result, StoreError};
pub use pipeline::{GroupKey, Pipeline, Stage};
pub use query::{Condition, Filter, FindOptions};
pub use results::{DeleteResult, UpdateResult};
pub use sort::{SortDirection, SortSpec};
pub use store::Store;
pub use update::Update;
