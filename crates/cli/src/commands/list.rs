use serde_json::Value;
use showroom_store::{Result, Store};
use tracing::info;

/// List the collections of the store, sorted by name.
pub async fn run(store: &Store) -> Result<Value> {
    info!("Listing collections in store {:?}", store.root_path());
    let names = store.list_collections().await?;
    info!("Found {} collections", names.len());
    Ok(Value::from(names))
}
