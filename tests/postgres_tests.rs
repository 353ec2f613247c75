// tests/postgres_tests.rs
//
// Runs against a real PostgreSQL only when DATABASE_URL is set; otherwise
// each test returns early.

use ecsite::{
    error::AppError,
    models::product::NewProduct,
    seed::{self, SeedData},
    services::{catalog, likes, reset},
    store::{PgStore, Store},
};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Option<PgStore> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => url,
        _ => {
            eprintln!("DATABASE_URL not set to PostgreSQL, skipping");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    let store = PgStore::new(pool);
    store.migrate().await.expect("Failed to migrate database");
    Some(store)
}

fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn like_and_reset_by_product_roundtrip() {
    let Some(store) = connect().await else { return };

    let product = store
        .insert_product(NewProduct {
            name: unique("Compass"),
            images: vec!["https://img.example.com/c.png".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();
    let user = store.insert_user(&unique("u"), "", "hash").await.unwrap();

    assert_eq!(likes::record_like(&store, user.id, product.id).await.unwrap(), 1);
    assert_eq!(likes::record_like(&store, user.id, product.id).await.unwrap(), 2);
    assert_eq!(
        likes::get_liked_products(&store, user.id).await.unwrap(),
        vec![product.id]
    );

    let fetched = catalog::get_by_id(&store, product.id).await.unwrap();
    assert_eq!(fetched.images, product.images);
    assert_eq!(fetched.likes, 2);

    reset::reset_by_product(&store, product.id).await.unwrap();
    assert_eq!(store.count_likes_for_product(product.id).await.unwrap(), 0);
    assert_eq!(catalog::get_by_id(&store, product.id).await.unwrap().likes, 0);
    assert!(likes::get_liked_products(&store, user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_by_user_recounts_from_remaining_records() {
    let Some(store) = connect().await else { return };

    let product = store
        .insert_product(NewProduct { name: unique("Ruler"), ..Default::default() })
        .await
        .unwrap();
    let alice = store.insert_user(&unique("a"), "", "hash").await.unwrap();
    let bob = store.insert_user(&unique("b"), "", "hash").await.unwrap();

    likes::record_like(&store, alice.id, product.id).await.unwrap();
    likes::record_like(&store, bob.id, product.id).await.unwrap();

    reset::reset_by_user(&store, alice.id).await.unwrap();

    assert_eq!(catalog::get_by_id(&store, product.id).await.unwrap().likes, 1);
    assert!(likes::get_liked_products(&store, alice.id).await.unwrap().is_empty());
    assert_eq!(
        likes::get_liked_products(&store, bob.id).await.unwrap(),
        vec![product.id]
    );
}

#[tokio::test]
async fn pattern_postgres_cannot_compile_is_bad_request() {
    let Some(store) = connect().await else { return };

    // Valid for the regex crate, an invalid escape for Postgres.
    let result = catalog::search_by_name(&store, r"\pL").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))), "{:?}", result);
}

#[tokio::test]
async fn seeding_a_populated_catalog_keeps_ids_and_likes() {
    let Some(store) = connect().await else { return };

    let product = store
        .insert_product(NewProduct { name: unique("Protractor"), ..Default::default() })
        .await
        .unwrap();
    let user = store.insert_user(&unique("s"), "", "hash").await.unwrap();
    likes::record_like(&store, user.id, product.id).await.unwrap();

    let line = format!(r#"{{"name": "{}"}}"#, unique("Seeded"));
    let summary = seed::import(&store, SeedData::parse(&line).unwrap()).await.unwrap();
    assert_eq!(summary.products, 0);
    assert_eq!(summary.products_skipped, 1);

    let fetched = catalog::get_by_id(&store, product.id).await.unwrap();
    assert_eq!(fetched.name, product.name);
    assert_eq!(fetched.likes, 1);
    assert_eq!(
        likes::get_liked_products(&store, user.id).await.unwrap(),
        vec![product.id]
    );
}
