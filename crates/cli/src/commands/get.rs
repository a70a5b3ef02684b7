use clap::Args;
use serde_json::Value;
use showroom_store::{Result, Store};
use tracing::{info, warn};

/// Arguments for the get command.
#[derive(Args, Clone, Default)]
pub struct GetArgs {
    /// Collection name
    pub collection: String,
    /// Document `_id`
    pub id:         String,
}

/// Print the document with the given `_id`, or `null` when there is none.
pub async fn run(store: &Store, args: GetArgs) -> Result<Value> {
    info!(
        "Getting document '{}' from collection '{}'",
        args.id, args.collection
    );
    match store.collection(&args.collection).find_by_id(&args.id).await? {
        Some(doc) => Ok(doc.into()),
        None => {
            warn!(
                "Document '{}' not found in collection '{}'",
                args.id, args.collection
            );
            Ok(Value::Null)
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_get_existing_and_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;
        let doc = store
            .collection("cars")
            .insert_one(json!({"brand": "Audi"}))
            .await
            .unwrap();

        let found = run(&store, GetArgs {
            collection: "cars".to_owned(),
            id:         doc.id().unwrap().to_owned(),
        })
        .await
        .unwrap();
        assert_eq!(found, Value::from(doc));

        let missing = run(&store, GetArgs {
            collection: "cars".to_owned(),
            id:         "nope".to_owned(),
        })
        .await
        .unwrap();
        assert_eq!(missing, Value::Null);
    }
}
