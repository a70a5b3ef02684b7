use clap::Args;
use serde_json::Value;
use showroom_store::{Result, Store, Update};
use tracing::{info, warn};

use super::{parse_json, target_filter};

/// Arguments for the update command.
#[derive(Args, Clone, Default)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: String,
    /// `_id` of the document to update
    #[arg(long, conflicts_with = "filter", required_unless_present = "filter")]
    pub id:         Option<String>,
    /// Filter selecting the document to update; the first match is updated
    #[arg(long, value_name = "JSON")]
    pub filter:     Option<String>,
    /// Update as JSON: '{"$set": {...}}' merges fields, any other object replaces them
    #[arg(short, long, value_name = "JSON")]
    pub data:       String,
}

/// Update the first matching document and print the match counts.
pub async fn run(store: &Store, args: UpdateArgs) -> Result<Value> {
    let filter = target_filter(args.id.as_deref(), args.filter.as_deref())?;
    let update = Update::from_value(&parse_json("--data", &args.data)?)?;
    info!("Updating a document in collection '{}'", args.collection);
    let result = store
        .collection(&args.collection)
        .update_one(&filter, &update)
        .await?;
    if result.matched_count == 0 {
        warn!("No document in '{}' matched the update target", args.collection);
    }
    Ok(serde_json::to_value(result)?)
}
