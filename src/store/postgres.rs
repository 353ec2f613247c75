// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use super::Store;
use crate::{
    error::AppError,
    models::{
        like::Like,
        product::{NewProduct, Product, Review},
        user::User,
    },
};

const PRODUCT_COLUMNS: &str = r#"
    id, name, description, price, category, type, brand, stock, images,
    rating, specifications, discount, created_at, updated_at, tags, likes, reviews
"#;

const USER_COLUMNS: &str = "id, username, email, password, created_at, liked_products";

/// SQLSTATE raised when `~` is given a pattern Postgres cannot compile.
const INVALID_REGULAR_EXPRESSION: &str = "2201B";

/// Row shape of the `products` table.
/// JSONB columns are decoded through `sqlx::types::Json`.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    category: String,
    #[sqlx(rename = "type")]
    product_type: String,
    brand: String,
    stock: i32,
    images: Vec<String>,
    rating: f64,
    specifications: Json<serde_json::Map<String, serde_json::Value>>,
    discount: f64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    tags: Vec<String>,
    likes: i64,
    reviews: Json<Vec<Review>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            product_type: row.product_type,
            brand: row.brand,
            stock: row.stock,
            images: row.images,
            rating: row.rating,
            specifications: row.specifications.0,
            discount: row.discount,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tags: row.tags,
            likes: row.likes,
            reviews: row.reviews.0,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
    liked_products: Vec<i64>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            created_at: row.created_at,
            liked_products: row.liked_products,
        }
    }
}

/// PostgreSQL-backed store. Tables mirror the three document collections;
/// `likes` has no foreign keys so records may outlive what they reference.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn search_products(&self, pattern: &str) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name ~ $1 ORDER BY id"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| {
            let code = err.as_database_error().and_then(|db| db.code());
            if code.as_deref() == Some(INVALID_REGULAR_EXPRESSION) {
                AppError::BadRequest(format!("Invalid search pattern: {}", pattern))
            } else {
                AppError::from(err)
            }
        })?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert_product(&self, p: NewProduct) -> Result<Product, AppError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products
            (name, description, price, category, type, brand, stock, images,
             rating, specifications, discount, created_at, updated_at, tags, likes, reviews)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(p.name)
        .bind(p.description)
        .bind(p.price)
        .bind(p.category)
        .bind(p.product_type)
        .bind(p.brand)
        .bind(p.stock)
        .bind(p.images)
        .bind(p.rating)
        .bind(Json(p.specifications))
        .bind(p.discount)
        .bind(p.created_at)
        .bind(p.updated_at)
        .bind(p.tags)
        .bind(p.likes)
        .bind(Json(p.reviews))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn increment_product_likes(&self, id: i64) -> Result<Option<i64>, AppError> {
        let likes = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET likes = likes + 1 WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn decrement_product_likes(&self, id: i64, by: i64) -> Result<Option<i64>, AppError> {
        let likes = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET likes = GREATEST(0, likes - $2) WHERE id = $1 RETURNING likes",
        )
        .bind(id)
        .bind(by)
        .fetch_optional(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn set_product_likes(&self, id: i64, likes: i64) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE products SET likes = $2 WHERE id = $1")
            .bind(id)
            .bind(likes)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn add_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError> {
        // Set semantics: append only when absent, but still report the row as matched.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET liked_products = CASE
                WHEN $2 = ANY(liked_products) THEN liked_products
                ELSE array_append(liked_products, $2)
            END
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET liked_products = array_remove(liked_products, $2) WHERE id = $1",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn pull_liked_product_from_all(&self, product_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET liked_products = array_remove(liked_products, $1)
            WHERE $1 = ANY(liked_products)
            "#,
        )
        .bind(product_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_liked_products(&self, user_id: i64, product_ids: &[i64]) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET liked_products = $2 WHERE id = $1")
            .bind(user_id)
            .bind(product_ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_like(&self, user_id: i64, product_id: i64) -> Result<Like, AppError> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            INSERT INTO likes (user_id, product_id)
            VALUES ($1, $2)
            RETURNING id, user_id, product_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(like)
    }

    async fn list_likes(&self) -> Result<Vec<Like>, AppError> {
        let likes = sqlx::query_as::<_, Like>(
            "SELECT id, user_id, product_id, created_at FROM likes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn count_likes_for_product(&self, product_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE product_id = $1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_likes_by_user(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_likes_by_product(&self, product_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_likes_for_pair(&self, user_id: i64, product_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_likes(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM likes").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
