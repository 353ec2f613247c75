// src/handlers/like.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    extract::AppJson,
    models::like::{LikeRequest, LikeResponse},
    services::likes,
    store::Store,
};

/// Likes a product on behalf of a user. Returns the product's new like count.
pub async fn like_product(
    State(store): State<Arc<dyn Store>>,
    AppJson(payload): AppJson<LikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let likes = likes::record_like(store.as_ref(), payload.user_id, payload.product_id).await?;
    Ok(Json(LikeResponse { likes }))
}

/// Returns the ids of products the user has liked.
pub async fn get_liked_products(
    State(store): State<Arc<dyn Store>>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let liked = likes::get_liked_products(store.as_ref(), user_id).await?;
    Ok(Json(liked))
}
