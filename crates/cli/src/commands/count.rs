use clap::Args;
use serde_json::{json, Value};
use showroom_store::{Result, Store};
use tracing::info;

use super::target_filter;

/// Arguments for the count command.
#[derive(Args, Clone, Default)]
pub struct CountArgs {
    /// Collection name
    pub collection: String,
    /// Filter as JSON; every document is counted when omitted
    #[arg(long, value_name = "JSON")]
    pub filter:     Option<String>,
}

/// Count matching documents.
pub async fn run(store: &Store, args: CountArgs) -> Result<Value> {
    info!("Counting documents in collection '{}'", args.collection);
    let filter = target_filter(None, args.filter.as_deref())?;
    let count = store
        .collection(&args.collection)
        .count_documents(&filter)
        .await?;
    Ok(json!({"count": count}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;
        store
            .collection("orders")
            .insert_many(vec![json!({"status": "paid"}), json!({"status": "pending"})])
            .await
            .unwrap();

        let all = run(&store, CountArgs {
            collection: "orders".to_owned(),
            filter:     None,
        })
        .await
        .unwrap();
        assert_eq!(all, json!({"count": 2}));

        let paid = run(&store, CountArgs {
            collection: "orders".to_owned(),
            filter:     Some(r#"{"status": "paid"}"#.to_owned()),
        })
        .await
        .unwrap();
        assert_eq!(paid, json!({"count": 1}));
    }
}
