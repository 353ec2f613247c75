// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Represents a user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip_serializing, default)]
    pub password: String,

    pub created_at: DateTime<Utc>,

    /// Products this user has liked (set semantics, denormalized from the like log).
    #[serde(rename = "likedProducts")]
    pub liked_products: Vec<i64>,
}

/// DTO for a user imported from the seed file. `password` is plaintext here
/// and is hashed before it reaches the store.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: Option<String>,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}
