/// Store operations.
pub mod operations;
/// Store implementation.
pub mod stor;

pub use stor::Store;
