use clap::Args;
use serde_json::{json, Value};
use showroom_store::{Result, Store};
use tracing::{info, warn};

/// Arguments for the drop command.
#[derive(Args, Clone, Default)]
pub struct DropArgs {
    /// Collection name
    pub collection: String,
}

/// Delete the collection file. Dropping a missing collection is not an error.
pub async fn run(store: &Store, args: DropArgs) -> Result<Value> {
    info!("Dropping collection '{}'", args.collection);
    let dropped = store.drop_collection(&args.collection).await?;
    if !dropped {
        warn!("Collection '{}' does not exist", args.collection);
    }
    Ok(json!({"dropped": dropped}))
}
