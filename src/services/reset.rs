// src/services/reset.rs

use crate::{error::AppError, services::projection, store::Store};

/// Drops every like made by `user_id`, recounts all products and clears the
/// user's liked set. A missing user is not an error.
pub async fn reset_by_user(store: &dyn Store, user_id: i64) -> Result<(), AppError> {
    tracing::info!(user_id, "Resetting likes for user");

    let deleted = store.delete_likes_by_user(user_id).await?;
    tracing::debug!(user_id, deleted, "Like records deleted");

    // Full rescan: every product is rewritten, changed or not.
    for product in store.list_products().await? {
        let count = store.count_likes_for_product(product.id).await?;
        store.set_product_likes(product.id, count).await?;
        tracing::debug!(product_id = product.id, count, "Product like count recomputed");
    }

    let found = store.set_liked_products(user_id, &[]).await?;
    tracing::debug!(user_id, found, "User liked products cleared");

    Ok(())
}

/// Drops every like on `product_id`, zeroes its counter and pulls it from
/// every user's liked set. Like records are deleted before the product is
/// looked up, so an unknown product still loses its dangling records.
pub async fn reset_by_product(store: &dyn Store, product_id: i64) -> Result<(), AppError> {
    tracing::info!(product_id, "Resetting likes for product");

    store.delete_likes_by_product(product_id).await?;

    let product = store
        .find_product(product_id)
        .await?
        .ok_or(AppError::NotFound("Product not found".to_string()))?;
    store.set_product_likes(product.id, 0).await?;

    let users = store.pull_liked_product_from_all(product_id).await?;
    tracing::debug!(product_id, users, "Product pulled from liked sets");

    Ok(())
}

/// Removes every like record for one (user, product) pair and adjusts both
/// counters. Returns the number of records removed.
pub async fn delete_like(store: &dyn Store, user_id: i64, product_id: i64) -> Result<u64, AppError> {
    let deleted = store.delete_likes_for_pair(user_id, product_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Like not found".to_string()));
    }

    if store
        .decrement_product_likes(product_id, deleted as i64)
        .await?
        .is_none()
    {
        tracing::warn!(product_id, "Deleted likes referenced a missing product");
    }
    store.remove_liked_product(user_id, product_id).await?;

    tracing::info!(user_id, product_id, deleted, "Like records deleted");
    Ok(deleted)
}

/// Empties the like log and rebuilds every counter from it.
pub async fn delete_all_likes(store: &dyn Store) -> Result<u64, AppError> {
    let deleted = store.delete_all_likes().await?;
    let report = projection::reconcile(store).await?;

    tracing::info!(
        deleted,
        products = report.products_updated,
        users = report.users_updated,
        "All like records deleted"
    );
    Ok(deleted)
}
