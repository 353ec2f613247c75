// src/seed.rs

//! Catalog import.
//!
//! Accepts either a JSON document `{ "products": [...], "users": [...] }` or
//! newline-delimited product objects, including MongoDB extended JSON exports.
//! Products are loaded only into an empty catalog so existing ids (and the
//! likes that point at them) stay valid; users are added only when their
//! username is free.

use std::path::Path;

use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::{product::NewProduct, user::NewUser},
    store::Store,
    utils::hash::hash_password,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub products: Vec<NewProduct>,
    pub users: Vec<NewUser>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub products_skipped: usize,
    pub users: usize,
    pub users_skipped: usize,
}

impl SeedData {
    /// Parses either seed format.
    pub fn parse(content: &str) -> Result<Self, AppError> {
        // A lone product line is also a JSON object, so look for the document keys.
        if let Ok(serde_json::Value::Object(doc)) = serde_json::from_str(content) {
            if doc.contains_key("products") || doc.contains_key("users") {
                return Ok(serde_json::from_value(serde_json::Value::Object(doc))?);
            }
        }

        let products = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<NewProduct>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SeedData {
            products,
            users: Vec::new(),
        })
    }
}

pub async fn import_file(store: &dyn Store, path: impl AsRef<Path>) -> Result<SeedSummary, AppError> {
    let path = path.as_ref();
    tracing::info!("Importing seed data from {}", path.display());

    let content = tokio::fs::read_to_string(path).await?;
    let data = SeedData::parse(&content)?;
    import(store, data).await
}

/// Validates everything first, then fills an empty catalog and adds users.
pub async fn import(store: &dyn Store, data: SeedData) -> Result<SeedSummary, AppError> {
    for product in &data.products {
        product.validate()?;
    }
    for user in &data.users {
        user.validate()?;
    }

    let mut summary = SeedSummary::default();

    let existing = store.list_products().await?.len();
    if existing > 0 {
        tracing::info!(
            existing,
            "Catalog already populated, skipping {} seed products",
            data.products.len()
        );
        summary.products_skipped = data.products.len();
    } else {
        for product in data.products {
            store.insert_product(product).await?;
            summary.products += 1;
        }
    }

    for user in data.users {
        if store.find_user_by_username(&user.username).await?.is_some() {
            tracing::debug!("User {} already exists, skipping", user.username);
            summary.users_skipped += 1;
            continue;
        }

        let hashed = hash_password(&user.password)?;
        store
            .insert_user(&user.username, user.email.as_deref().unwrap_or(""), &hashed)
            .await?;
        summary.users += 1;
    }

    tracing::info!(
        products = summary.products,
        products_skipped = summary.products_skipped,
        users = summary.users,
        users_skipped = summary.users_skipped,
        "Seed data imported"
    );

    Ok(summary)
}
