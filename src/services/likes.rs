// src/services/likes.rs

use crate::{error::AppError, store::Store};

/// Records a like and updates both denormalized counters.
///
/// Steps run in order without a transaction: the like record and the
/// product counter are written before the user is checked, so a missing
/// user leaves them behind. `projection::reconcile` repairs that drift.
/// Repeat likes append new records; only the user's liked set is deduplicated.
pub async fn record_like(store: &dyn Store, user_id: i64, product_id: i64) -> Result<i64, AppError> {
    tracing::debug!(user_id, product_id, "Like request received");

    store.insert_like(user_id, product_id).await?;

    let likes = match store.increment_product_likes(product_id).await? {
        Some(likes) => likes,
        None => {
            tracing::warn!(product_id, "Like for unknown product");
            return Err(AppError::NotFound("Product not found".to_string()));
        }
    };

    if !store.add_liked_product(user_id, product_id).await? {
        tracing::warn!(user_id, "Like from unknown user");
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(product_id, likes, "Product like count updated");
    Ok(likes)
}

/// The user's stored liked-product list, returned verbatim.
pub async fn get_liked_products(store: &dyn Store, user_id: i64) -> Result<Vec<i64>, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(user.liked_products)
}
