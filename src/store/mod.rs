//! Document store abstraction over the products, users and likes collections.
//!
//! Every operation is a single store-level step; multi-step sequences (like,
//! reset, reconcile) live in `services` and are not atomic across steps.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        like::Like,
        product::{NewProduct, Product},
        user::User,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // ----- products -----

    /// All products ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError>;

    /// Products whose name matches `pattern` (a validated regular expression).
    async fn search_products(&self, pattern: &str) -> Result<Vec<Product>, AppError>;

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Atomically adds one to the like counter and returns the new value.
    /// `None` when the product does not exist.
    async fn increment_product_likes(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Subtracts `by` from the like counter, floored at zero.
    async fn decrement_product_likes(&self, id: i64, by: i64) -> Result<Option<i64>, AppError>;

    /// Overwrites the like counter. Returns false when the product does not exist.
    async fn set_product_likes(&self, id: i64, likes: i64) -> Result<bool, AppError>;

    // ----- users -----

    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Inserts a user; `password_hash` must already be hashed.
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>;

    /// Adds `product_id` to the user's liked set if absent.
    /// Returns false when the user does not exist.
    async fn add_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError>;

    /// Removes `product_id` from one user's liked set.
    async fn remove_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError>;

    /// Removes `product_id` from every user's liked set. Returns users touched.
    async fn pull_liked_product_from_all(&self, product_id: i64) -> Result<u64, AppError>;

    /// Replaces the user's liked set. A missing user is a no-op returning false.
    async fn set_liked_products(&self, user_id: i64, product_ids: &[i64]) -> Result<bool, AppError>;

    // ----- likes -----

    /// Appends a like record. Never deduplicates.
    async fn insert_like(&self, user_id: i64, product_id: i64) -> Result<Like, AppError>;

    /// The whole like log ordered by id (insertion order).
    async fn list_likes(&self) -> Result<Vec<Like>, AppError>;

    async fn count_likes_for_product(&self, product_id: i64) -> Result<i64, AppError>;

    async fn delete_likes_by_user(&self, user_id: i64) -> Result<u64, AppError>;

    async fn delete_likes_by_product(&self, product_id: i64) -> Result<u64, AppError>;

    async fn delete_likes_for_pair(&self, user_id: i64, product_id: i64) -> Result<u64, AppError>;

    async fn delete_all_likes(&self) -> Result<u64, AppError>;
}
