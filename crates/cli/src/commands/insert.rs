use clap::Args;
use serde_json::Value;
use showroom_store::{Result, Store};
use tracing::info;

use super::parse_json;

/// Arguments for the insert command.
#[derive(Args, Clone, Default)]
pub struct InsertArgs {
    /// Collection name
    pub collection: String,
    /// A JSON object to insert, or a JSON array of objects to insert as one batch
    #[arg(short, long)]
    pub data:       String,
}

/// Insert one document or a batch and print what was stored.
///
/// An object goes through `insert_one`; an array goes through `insert_many`, which
/// rejects the whole batch if any element is not an object.
pub async fn run(store: &Store, args: InsertArgs) -> Result<Value> {
    let collection = store.collection(&args.collection);
    match parse_json("--data", &args.data)? {
        Value::Array(items) => {
            info!(
                "Inserting {} documents into '{}'",
                items.len(),
                args.collection
            );
            let docs = collection.insert_many(items).await?;
            info!("Inserted {} documents", docs.len());
            Ok(Value::Array(docs.into_iter().map(Value::from).collect()))
        },
        fields => {
            info!("Inserting a document into '{}'", args.collection);
            let doc = collection.insert_one(fields).await?;
            info!("Inserted document {:?}", doc.id());
            Ok(doc.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use showroom_store::{Filter, StoreError};

    use super::*;

    fn args(data: &str) -> InsertArgs {
        InsertArgs {
            collection: "cars".to_owned(),
            data:       data.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_insert_object() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;

        let output = run(&store, args(r#"{"brand": "BMW"}"#)).await.unwrap();
        assert_eq!(output["brand"], "BMW");
        assert!(output["_id"].is_string());
    }

    #[tokio::test]
    async fn test_insert_array() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;

        let output = run(&store, args(r#"[{"brand": "BMW"}, {"brand": "Audi"}]"#))
            .await
            .unwrap();
        assert_eq!(output.as_array().map(Vec::len), Some(2));
        assert_eq!(
            store
                .collection("cars")
                .count_documents(&Filter::new())
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_scalars_and_bad_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;

        assert!(matches!(
            run(&store, args("42")).await,
            Err(StoreError::InvalidDocument { .. })
        ));
        assert!(matches!(
            run(&store, args("[{}, 1]")).await,
            Err(StoreError::InvalidDocument { .. })
        ));
        assert!(matches!(
            run(&store, args("{brand}")).await,
            Err(StoreError::Json { .. })
        ));
    }
}
