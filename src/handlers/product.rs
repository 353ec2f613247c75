// src/handlers/product.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::product::ProductListParams,
    services::catalog,
    store::Store,
};

/// Lists all products, or searches by name when `?query=` is present.
pub async fn list_products(
    State(store): State<Arc<dyn Store>>,
    Query(params): Query<ProductListParams>,
) -> Result<impl IntoResponse, AppError> {
    let products = match params.query {
        Some(query) => catalog::search_by_name(store.as_ref(), &query).await?,
        None => catalog::list_all(store.as_ref()).await?,
    };

    Ok(Json(products))
}

/// Retrieves a single product by ID.
pub async fn get_product(
    State(store): State<Arc<dyn Store>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = catalog::get_by_id(store.as_ref(), id).await?;
    Ok(Json(product))
}
