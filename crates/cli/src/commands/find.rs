use clap::Args;
use serde_json::Value;
use showroom_store::{FindOptions, Result, SortSpec, Store};
use tracing::info;

use super::{parse_json, target_filter};

/// Arguments for the find command.
#[derive(Args, Clone, Default)]
pub struct FindArgs {
    /// Collection name
    pub collection: String,
    /// Filter as JSON, e.g. '{"brand": "BMW", "price": {"$gte": 3000000}}'
    #[arg(long, value_name = "JSON")]
    pub filter:     Option<String>,
    /// Sort specification as JSON, e.g. '{"brand": 1, "price": -1}'
    #[arg(long, value_name = "JSON")]
    pub sort:       Option<String>,
    /// Number of results to skip
    #[arg(long)]
    pub skip:       Option<usize>,
    /// Maximum number of results
    #[arg(long)]
    pub limit:      Option<usize>,
    /// Fields to keep (comma-separated); `_id` is always kept
    #[arg(long, value_name = "field1,field2")]
    pub project:    Option<String>,
}

impl FindArgs {
    /// Convert CLI arguments to find options.
    fn to_find_options(&self) -> Result<FindOptions> {
        let mut options = FindOptions::new();
        if let Some(ref raw) = self.sort {
            options = options.sort(SortSpec::from_value(&parse_json("--sort", raw)?)?);
        }
        if let Some(skip) = self.skip {
            options = options.skip(skip);
        }
        if let Some(limit) = self.limit {
            options = options.limit(limit);
        }
        if let Some(ref fields) = self.project {
            options = options.projection(
                fields
                    .split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .collect(),
            );
        }
        Ok(options)
    }
}

/// Find documents in a collection and print them as a JSON array.
pub async fn run(store: &Store, args: FindArgs) -> Result<Value> {
    info!("Finding documents in collection '{}'", args.collection);
    let filter = target_filter(None, args.filter.as_deref())?;
    let options = args.to_find_options()?;
    let docs = store
        .collection(&args.collection)
        .find_with_options(&filter, &options)
        .await?;
    info!("Found {} documents", docs.len());
    Ok(Value::Array(docs.into_iter().map(Value::from).collect()))
}
