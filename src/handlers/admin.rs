// src/handlers/admin.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    extract::AppJson,
    models::like::{LikeRequest, ResetByProductRequest, ResetByUserRequest},
    services::{projection, reset},
    store::Store,
};

/// Clears every like made by a user and recounts all products.
pub async fn reset_likes_by_user(
    State(store): State<Arc<dyn Store>>,
    AppJson(payload): AppJson<ResetByUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    reset::reset_by_user(store.as_ref(), payload.user_id).await?;
    Ok(Json(json!({ "message": "User likes have been reset" })))
}

/// Clears every like on a product and removes it from all liked lists.
pub async fn reset_likes_by_product(
    State(store): State<Arc<dyn Store>>,
    AppJson(payload): AppJson<ResetByProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    reset::reset_by_product(store.as_ref(), payload.product_id).await?;
    Ok(Json(json!({ "message": "Product likes have been reset" })))
}

/// Deletes the like records of one user on one product.
pub async fn delete_like(
    State(store): State<Arc<dyn Store>>,
    AppJson(payload): AppJson<LikeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let deleted = reset::delete_like(store.as_ref(), payload.user_id, payload.product_id).await?;
    Ok(Json(json!({ "message": "Like deleted", "deleted": deleted })))
}

/// Deletes every like record and zeroes all counters.
pub async fn delete_all_likes(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = reset::delete_all_likes(store.as_ref()).await?;
    Ok(Json(json!({ "message": "All likes deleted", "deleted": deleted })))
}

/// Rebuilds every denormalized counter from the like log.
pub async fn reconcile_likes(
    State(store): State<Arc<dyn Store>>,
) -> Result<impl IntoResponse, AppError> {
    let report = projection::reconcile(store.as_ref()).await?;
    Ok(Json(report))
}
