use clap::Args;
use serde_json::Value;
use showroom_store::{Result, Store};
use tracing::{info, warn};

use super::target_filter;

/// Arguments for the delete command.
#[derive(Args, Clone, Default)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,
    /// `_id` of the document to delete
    #[arg(long, conflicts_with = "filter", required_unless_present = "filter")]
    pub id:         Option<String>,
    /// Filter selecting documents to delete; '{}' matches every document
    #[arg(long, value_name = "JSON")]
    pub filter:     Option<String>,
    /// Delete every match instead of the first one
    #[arg(long)]
    pub many:       bool,
}

/// Delete matching documents and print how many were removed.
pub async fn run(store: &Store, args: DeleteArgs) -> Result<Value> {
    let filter = target_filter(args.id.as_deref(), args.filter.as_deref())?;
    let collection = store.collection(&args.collection);
    info!(
        "Deleting {} from collection '{}'",
        if args.many { "all matches" } else { "the first match" },
        args.collection
    );
    let result = if args.many {
        collection.delete_many(&filter).await?
    }
    else {
        collection.delete_one(&filter).await?
    };
    if result.deleted_count == 0 {
        warn!("Nothing matched in collection '{}'", args.collection);
    }
    Ok(serde_json::to_value(result)?)
}
