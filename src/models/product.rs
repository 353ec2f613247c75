// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use super::extended_json::{optional_date, optional_id};

/// A catalog product.
///
/// `likes` is a denormalized counter over the like log; it can drift and is
/// repaired by the reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,

    /// Product type (e.g., "compass"). `type` is reserved in Rust.
    #[serde(rename = "type")]
    pub product_type: String,

    pub brand: String,
    pub stock: i32,

    /// Ordered list of image URLs.
    pub images: Vec<String>,

    pub rating: f64,

    /// Free-form key/value specifications (e.g., {"material": "metal"}).
    pub specifications: serde_json::Map<String, serde_json::Value>,

    /// Discount in percent.
    pub discount: f64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub likes: i64,
    pub reviews: Vec<Review>,
}

/// A review embedded in a product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Exported `{"$oid": ...}` reviewers have no numeric id and read as `None`.
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub date: Option<DateTime<Utc>>,
}

/// A product to be inserted into the catalog (seed import).
/// Every field except `name` is optional in the source data. Exported
/// documents may carry `_id`, `seller_id` and other fields; they are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200, message = "Product name must be between 1 and 200 chars"))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub stock: i32,
    #[validate(custom(function = validate_image_urls))]
    pub images: Vec<String>,
    pub rating: f64,
    pub specifications: serde_json::Map<String, serde_json::Value>,
    pub discount: f64,
    #[serde(deserialize_with = "optional_date")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "optional_date")]
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub likes: i64,
    pub reviews: Vec<Review>,
}

impl NewProduct {
    /// Materializes the product with the id assigned by the store.
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            product_type: self.product_type,
            brand: self.brand,
            stock: self.stock,
            images: self.images,
            rating: self.rating,
            specifications: self.specifications,
            discount: self.discount,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags: self.tags,
            likes: self.likes,
            reviews: self.reviews,
        }
    }
}

/// Validates a collection of image URLs, ensuring each meets length and format requirements.
fn validate_image_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}

/// Query parameters for `GET /api/products`.
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Name search pattern. Present-but-empty is rejected.
    pub query: Option<String>,
}
