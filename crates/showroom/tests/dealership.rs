//! End-to-end dealership scenario: stock a showroom, query it the way the storefront
//! and back office do, and read results back as typed records.

use serde::Deserialize;
use serde_json::json;
use showroom_store::{Document, Filter, FindOptions, Pipeline, SortSpec, Store, Update};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Car {
    #[serde(rename = "_id")]
    id:     String,
    brand:  String,
    model:  String,
    price:  u64,
    is_new: bool,
    status: String,
}

async fn stock_showroom(store: &Store) -> Vec<Document> {
    store
        .collection("cars")
        .insert_many(vec![
            json!({"brand": "BMW", "model": "X5", "price": 5_200_000, "isNew": true, "status": "available"}),
            json!({"brand": "Audi", "model": "A4", "price": 2_400_000, "isNew": false, "status": "available"}),
            json!({"brand": "BMW", "model": "320i", "price": 2_900_000, "isNew": false, "status": "sold"}),
            json!({"brand": "Mercedes", "model": "E200", "price": 4_300_000, "isNew": true, "status": "available"}),
            json!({"brand": "Audi", "model": "Q7", "price": 6_100_000, "isNew": true, "status": "sold"}),
            json!({"brand": "BMW", "model": "X3", "price": 3_000_000, "isNew": true, "status": "available"}),
        ])
        .await
        .unwrap()
}

#[tokio::test]
async fn test_catalogue_queries() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = Store::open(temp_dir.path()).await;
    stock_showroom(&store).await;
    let cars = store.collection("cars");

    let premium_new: Vec<Car> = cars
        .find_with_options(
            &Filter::from_value(&json!({"isNew": true, "price": {"$gte": 3_000_000}})).unwrap(),
            &FindOptions::new().sort(SortSpec::new().desc("price")),
        )
        .await
        .unwrap()
        .iter()
        .map(|doc| doc.parse().unwrap())
        .collect();
    let models: Vec<&str> = premium_new.iter().map(|car| car.model.as_str()).collect();
    assert_eq!(models, vec!["Q7", "X5", "E200", "X3"]);
    assert!(premium_new.iter().all(|car| car.is_new && car.price >= 3_000_000));

    let search = cars
        .find(&Filter::new().regex("model", "^x", "i").unwrap())
        .await
        .unwrap();
    assert_eq!(search.len(), 2);
}

#[tokio::test]
async fn test_brand_report() {
    let temp_dir = tempfile::tempdir().unwrap();
    let store = Store::open(temp_dir.path()).await;
    stock_showroom(&store).await;

    let report = store
        .collection("cars")
        .aggregate(
            &Pipeline::from_value(&json!([
                {"$match": {"brand": "BMW"}},
                {"$group": {"_id": "$brand"}}
            ]))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].get("_id"), Some(&json!("BMW")));
    assert_eq!(report[0].get("count"), Some(&json!(3)));

    let items: Vec<Car> = serde_json::from_value(report[0].get("items").cloned().unwrap()).unwrap();
    assert!(items.iter().all(|car| car.brand == "BMW"));
}

#[tokio::test]
async fn test_sale_lifecycle_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let stocked = {
        let store = Store::open(temp_dir.path()).await;
        stock_showroom(&store).await
    };
    let x5_id = stocked[0].id().unwrap().to_owned();

    let store = Store::open(temp_dir.path()).await;
    let cars = store.collection("cars");
    let orders = store.collection("orders");

    let order = orders
        .insert_one(json!({"carId": &x5_id, "customer": "Dana", "status": "pending"}))
        .await
        .unwrap();
    cars.update_by_id(&x5_id, &Update::from_value(&json!({"$set": {"status": "sold"}})).unwrap())
        .await
        .unwrap();
    orders
        .update_by_id(order.id().unwrap(), &Update::from_value(&json!({"status": "paid"})).unwrap())
        .await
        .unwrap();

    let x5: Car = cars.find_by_id(&x5_id).await.unwrap().unwrap().parse().unwrap();
    assert_eq!(x5.status, "sold");
    assert_eq!(x5.id, x5_id);

    let removed = cars
        .delete_many(&Filter::new().eq("status", "sold"))
        .await
        .unwrap();
    assert_eq!(removed.deleted_count, 3);
    assert_eq!(cars.count_documents(&Filter::new()).await.unwrap(), 3);

    assert_eq!(store.list_collections().await.unwrap(), vec!["cars", "orders"]);
    let paid = orders.find_one(&Filter::new().eq("status", "paid")).await.unwrap();
    assert_eq!(paid.and_then(|o| o.get("carId").cloned()), Some(json!(x5_id)));
}
