/// Collection aggregation operations.
pub mod aggregation;
/// Core collection implementation.
pub mod coll;
/// Collection write operations.
pub mod operations;
/// Collection query operations.
pub mod query;

pub use coll::*;
