use clap::Args;
use serde_json::Value;
use showroom_store::{Pipeline, Result, Store};
use tracing::info;

use super::parse_json;

/// Arguments for the aggregate command.
#[derive(Args, Clone, Default)]
pub struct AggregateArgs {
    /// Collection name
    pub collection: String,
    /// Pipeline as a JSON array of stages, e.g. '[{"$match": {...}}, {"$group": {"_id": "$brand"}}]'
    #[arg(short, long, value_name = "JSON")]
    pub pipeline:   String,
}

/// Run a pipeline over a collection and print the resulting documents.
pub async fn run(store: &Store, args: AggregateArgs) -> Result<Value> {
    let pipeline = Pipeline::from_value(&parse_json("--pipeline", &args.pipeline)?)?;
    info!(
        "Running a {}-stage pipeline on collection '{}'",
        pipeline.stages().len(),
        args.collection
    );
    let docs = store.collection(&args.collection).aggregate(&pipeline).await?;
    Ok(Value::Array(docs.into_iter().map(Value::from).collect()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use showroom_store::StoreError;

    use super::*;

    #[tokio::test]
    async fn test_aggregate_group() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;
        store
            .collection("cars")
            .insert_many(vec![
                json!({"brand": "BMW", "price": 3000000}),
                json!({"brand": "Audi", "price": 2500000}),
                json!({"brand": "BMW", "price": 4500000}),
            ])
            .await
            .unwrap();

        let output = run(&store, AggregateArgs {
            collection: "cars".to_owned(),
            pipeline:   r#"[{"$sort": {"price": -1}}, {"$group": {"_id": "$brand"}}]"#.to_owned(),
        })
        .await
        .unwrap();
        let groups = output.as_array().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0]["_id"], "BMW");
        assert_eq!(groups[0]["count"], 2);
        assert_eq!(groups[1]["_id"], "Audi");
    }

    #[tokio::test]
    async fn test_aggregate_rejects_non_array() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::open(temp_dir.path()).await;

        let result = run(&store, AggregateArgs {
            collection: "cars".to_owned(),
            pipeline:   r#"{"$match": {}}"#.to_owned(),
        })
        .await;
        assert!(matches!(result, Err(StoreError::InvalidPipeline { .. })));
    }
}
