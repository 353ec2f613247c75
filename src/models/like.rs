// src/models/like.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A single like event linking a user to a product.
/// The like log is the source of truth for every denormalized counter.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/like` and `DELETE /api/admin/likes`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[validate(range(min = 1, message = "userId must be a positive id"))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "productId must be a positive id"))]
    pub product_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

/// Body of `POST /api/admin/reset-likes-by-user`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetByUserRequest {
    #[validate(range(min = 1, message = "userId must be a positive id"))]
    pub user_id: i64,
}

/// Body of `POST /api/admin/reset-likes-by-product`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetByProductRequest {
    #[validate(range(min = 1, message = "productId must be a positive id"))]
    pub product_id: i64,
}

/// Outcome of a reconciliation pass over the like log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub like_records: usize,
    pub products_updated: usize,
    pub users_updated: usize,
    /// Like records pointing at a user or product that no longer exists.
    pub orphaned_likes: usize,
}
