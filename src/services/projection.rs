// src/services/projection.rs

//! Rebuilds the denormalized like counters from the like log.
//!
//! `Product.likes` and `User.likedProducts` are projections of the likes
//! collection. `reconcile` recomputes both and only writes documents that
//! drifted, so it can be re-run safely after any partial failure.

use std::collections::{HashMap, HashSet};

use crate::{
    error::AppError,
    models::like::{Like, ReconcileReport},
    store::Store,
};

/// Per-product counts and per-user liked sets derived from a like log.
#[derive(Debug, Default, PartialEq)]
pub struct LikeProjection {
    pub product_likes: HashMap<i64, i64>,
    /// Distinct product ids per user, in order of first like.
    pub user_likes: HashMap<i64, Vec<i64>>,
}

impl LikeProjection {
    pub fn from_log(likes: &[Like]) -> Self {
        let mut projection = Self::default();
        for like in likes {
            *projection.product_likes.entry(like.product_id).or_insert(0) += 1;
            let liked = projection.user_likes.entry(like.user_id).or_default();
            if !liked.contains(&like.product_id) {
                liked.push(like.product_id);
            }
        }
        projection
    }

    pub fn likes_for(&self, product_id: i64) -> i64 {
        self.product_likes.get(&product_id).copied().unwrap_or(0)
    }

    pub fn liked_by(&self, user_id: i64) -> &[i64] {
        self.user_likes
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn same_set(a: &[i64], b: &[i64]) -> bool {
    let a: HashSet<_> = a.iter().collect();
    let b: HashSet<_> = b.iter().collect();
    a == b
}

/// Recomputes every product counter and every user's liked set from the like log.
pub async fn reconcile(store: &dyn Store) -> Result<ReconcileReport, AppError> {
    let likes = store.list_likes().await?;
    let projection = LikeProjection::from_log(&likes);

    let products = store.list_products().await?;
    let users = store.list_users().await?;

    let mut report = ReconcileReport {
        like_records: likes.len(),
        ..Default::default()
    };

    for product in &products {
        let expected = projection.likes_for(product.id);
        if product.likes != expected {
            store.set_product_likes(product.id, expected).await?;
            tracing::debug!(
                product_id = product.id,
                from = product.likes,
                to = expected,
                "Product like count reconciled"
            );
            report.products_updated += 1;
        }
    }

    for user in &users {
        let expected = projection.liked_by(user.id);
        if !same_set(&user.liked_products, expected) {
            store.set_liked_products(user.id, expected).await?;
            tracing::debug!(user_id = user.id, "User liked products reconciled");
            report.users_updated += 1;
        }
    }

    let product_ids: HashSet<i64> = products.iter().map(|p| p.id).collect();
    let user_ids: HashSet<i64> = users.iter().map(|u| u.id).collect();
    report.orphaned_likes = likes
        .iter()
        .filter(|l| !product_ids.contains(&l.product_id) || !user_ids.contains(&l.user_id))
        .count();

    tracing::info!(
        like_records = report.like_records,
        products_updated = report.products_updated,
        users_updated = report.users_updated,
        orphaned_likes = report.orphaned_likes,
        "Like projection reconciled"
    );

    Ok(report)
}
