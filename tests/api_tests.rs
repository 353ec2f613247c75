// tests/api_tests.rs

use std::sync::Arc;

use ecsite::{
    config::Config,
    models::product::NewProduct,
    routes,
    state::AppState,
    store::{MemoryStore, Store},
};
use serde_json::json;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the backing store
/// so tests can seed and inspect documents directly.
async fn spawn_app() -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());

    let config = Config {
        database_url: "memory://".to_string(),
        rust_log: "error".to_string(),
        port: 0,
        seed_file: None,
        allowed_origins: vec!["http://localhost:8080".to_string()],
    };

    let state = AppState {
        store: store.clone(),
        config,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (address, store)
}

fn product(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn lists_every_product() {
    let (address, store) = spawn_app().await;
    store.insert_product(product("Compass")).await.unwrap();
    store.insert_product(product("Ruler")).await.unwrap();

    let products: Vec<serde_json::Value> = reqwest::get(format!("{}/api/products", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Compass");
    assert_eq!(products[1]["name"], "Ruler");
}

#[tokio::test]
async fn get_product_returns_stored_fields() {
    let (address, store) = spawn_app().await;
    let mut specifications = serde_json::Map::new();
    specifications.insert("material".to_string(), json!("metal"));
    let stored = store
        .insert_product(NewProduct {
            name: "Deluxe Compass".to_string(),
            description: "A compass made of fine materials".to_string(),
            price: 1200.0,
            category: "stationery".to_string(),
            product_type: "compass".to_string(),
            brand: "Luxe".to_string(),
            stock: 100,
            images: vec!["https://img.example.com/compass.png".to_string()],
            rating: 4.5,
            specifications,
            discount: 20.0,
            tags: vec!["compass".to_string(), "stationery".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    let response = reqwest::get(format!("{}/api/products/{}", address, stored.id))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], stored.id);
    assert_eq!(body["name"], "Deluxe Compass");
    assert_eq!(body["type"], "compass");
    assert_eq!(body["price"], 1200.0);
    assert_eq!(body["stock"], 100);
    assert_eq!(body["specifications"]["material"], "metal");
    assert_eq!(body["tags"], json!(["compass", "stationery"]));
    assert_eq!(body["likes"], 0);
}

#[tokio::test]
async fn get_missing_product_is_404() {
    let (address, _) = spawn_app().await;

    let response = reqwest::get(format!("{}/api/products/987654", address))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn malformed_product_id_is_400() {
    let (address, _) = spawn_app().await;

    let response = reqwest::get(format!("{}/api/products/not-an-id", address))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn search_by_name() {
    let (address, store) = spawn_app().await;
    store.insert_product(product("Deluxe Compass")).await.unwrap();
    store.insert_product(product("Pencil")).await.unwrap();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/products", address))
        .query(&[("query", "Compass")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let products: Vec<serde_json::Value> = response.json().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Deluxe Compass");

    for empty in ["", "   "] {
        let response = client
            .get(format!("{}/api/products", address))
            .query(&[("query", empty)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "query {:?}", empty);
    }

    let response = client
        .get(format!("{}/api/products", address))
        .query(&[("query", "nonexistent-xyz")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    // Unbalanced group is not a valid pattern.
    let response = client
        .get(format!("{}/api/products", address))
        .query(&[("query", "(")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn like_increments_counter_and_keeps_liked_set_unique() {
    let (address, store) = spawn_app().await;
    let p = store.insert_product(product("Compass")).await.unwrap();
    let u = store.insert_user("alice", "alice@example.com", "hash").await.unwrap();
    let client = reqwest::Client::new();

    for expected in 1..=2 {
        let response = client
            .post(format!("{}/api/like", address))
            .json(&json!({ "userId": u.id, "productId": p.id }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["likes"], expected);
    }

    // Repeat likes are kept as separate records.
    assert_eq!(store.count_likes_for_product(p.id).await.unwrap(), 2);

    let liked: Vec<i64> = client
        .get(format!("{}/api/liked-products/{}", address, u.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(liked, vec![p.id]);
}

#[tokio::test]
async fn like_unknown_product_is_404_but_record_remains() {
    let (address, store) = spawn_app().await;
    let u = store.insert_user("alice", "", "hash").await.unwrap();

    let response = reqwest::Client::new()
        .post(format!("{}/api/like", address))
        .json(&json!({ "userId": u.id, "productId": 4242 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");

    assert_eq!(store.list_likes().await.unwrap().len(), 1);
    let user = store.find_user(u.id).await.unwrap().unwrap();
    assert!(user.liked_products.is_empty());
}

#[tokio::test]
async fn like_from_unknown_user_is_404_after_counter_moves() {
    let (address, store) = spawn_app().await;
    let p = store.insert_product(product("Compass")).await.unwrap();

    let response = reqwest::Client::new()
        .post(format!("{}/api/like", address))
        .json(&json!({ "userId": 4242, "productId": p.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User not found");

    let product = store.find_product(p.id).await.unwrap().unwrap();
    assert_eq!(product.likes, 1);
}

#[tokio::test]
async fn like_rejects_non_positive_ids() {
    let (address, _) = spawn_app().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/like", address))
        .json(&json!({ "userId": 0, "productId": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn liked_products_of_unknown_user_is_404() {
    let (address, _) = spawn_app().await;

    let response = reqwest::get(format!("{}/api/liked-products/31337", address))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn user_password_is_never_serialized() {
    let (_, store) = spawn_app().await;
    let u = store.insert_user("alice", "", "argon2-hash").await.unwrap();

    let body = serde_json::to_value(&u).unwrap();
    assert!(body.get("password").is_none());
    assert_eq!(body["likedProducts"], json!([]));
}

#[tokio::test]
async fn malformed_like_body_is_400() {
    let (address, _) = spawn_app().await;
    let client = reqwest::Client::new();

    for body in [
        json!({ "userId": 1 }),
        json!({ "userId": "abc", "productId": 1 }),
        json!({}),
    ] {
        let response = client
            .post(format!("{}/api/like", address))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "body {}", body);

        let error: serde_json::Value = response.json().await.unwrap();
        assert!(error["message"].is_string());
    }
}
