// src/services/catalog.rs

use regex::Regex;

use crate::{error::AppError, models::product::Product, store::Store};

/// Every product in the catalog, no pagination.
pub async fn list_all(store: &dyn Store) -> Result<Vec<Product>, AppError> {
    store.list_products().await
}

pub async fn get_by_id(store: &dyn Store, id: i64) -> Result<Product, AppError> {
    store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))
}

/// Matches `query` against product names as a case-sensitive pattern.
/// An empty result is reported as `NotFound` rather than an empty list.
pub async fn search_by_name(store: &dyn Store, query: &str) -> Result<Vec<Product>, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Search query cannot be empty".to_string(),
        ));
    }

    // Reject bad patterns up front so both backends answer 400 the same way.
    Regex::new(query)?;

    let products = store.search_products(query).await?;
    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found matching the search criteria".to_string(),
        ));
    }

    Ok(products)
}
