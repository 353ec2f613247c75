// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    error::AppError,
    models::{
        like::Like,
        product::{NewProduct, Product},
        user::User,
    },
};

#[derive(Default)]
struct Collections {
    products: BTreeMap<i64, Product>,
    users: BTreeMap<i64, User>,
    likes: BTreeMap<i64, Like>,
    next_product_id: i64,
    next_user_id: i64,
    next_like_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-process store used for local runs (`DATABASE_URL=memory://`) and tests.
/// Each method takes the lock once, so every single operation is atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.inner.read().await.products.values().cloned().collect())
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>, AppError> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn search_products(&self, pattern: &str) -> Result<Vec<Product>, AppError> {
        let re = Regex::new(pattern)?;
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| re.is_match(&p.name))
            .cloned()
            .collect())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, AppError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.next_product_id);
        let product = product.into_product(id);
        inner.products.insert(id, product.clone());
        Ok(product)
    }

    async fn increment_product_likes(&self, id: i64) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.get_mut(&id).map(|p| {
            p.likes += 1;
            p.likes
        }))
    }

    async fn decrement_product_likes(&self, id: i64, by: i64) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.get_mut(&id).map(|p| {
            p.likes = (p.likes - by).max(0);
            p.likes
        }))
    }

    async fn set_product_likes(&self, id: i64, likes: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.products.get_mut(&id) {
            Some(p) => {
                p.likes = likes;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.next_user_id);
        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: Utc::now(),
            liked_products: Vec::new(),
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn add_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                if !user.liked_products.contains(&product_id) {
                    user.liked_products.push(product_id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_liked_product(&self, user_id: i64, product_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.liked_products.retain(|id| *id != product_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_liked_product_from_all(&self, product_id: i64) -> Result<u64, AppError> {
        let mut inner = self.inner.write().await;
        let mut touched = 0;
        for user in inner.users.values_mut() {
            let before = user.liked_products.len();
            user.liked_products.retain(|id| *id != product_id);
            if user.liked_products.len() != before {
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn set_liked_products(&self, user_id: i64, product_ids: &[i64]) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.liked_products = product_ids.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_like(&self, user_id: i64, product_id: i64) -> Result<Like, AppError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.next_like_id);
        let like = Like {
            id,
            user_id,
            product_id,
            created_at: Utc::now(),
        };
        inner.likes.insert(id, like.clone());
        Ok(like)
    }

    async fn list_likes(&self) -> Result<Vec<Like>, AppError> {
        Ok(self.inner.read().await.likes.values().cloned().collect())
    }

    async fn count_likes_for_product(&self, product_id: i64) -> Result<i64, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .values()
            .filter(|l| l.product_id == product_id)
            .count() as i64)
    }

    async fn delete_likes_by_user(&self, user_id: i64) -> Result<u64, AppError> {
        Ok(self.delete_likes_where(|l| l.user_id == user_id).await)
    }

    async fn delete_likes_by_product(&self, product_id: i64) -> Result<u64, AppError> {
        Ok(self.delete_likes_where(|l| l.product_id == product_id).await)
    }

    async fn delete_likes_for_pair(&self, user_id: i64, product_id: i64) -> Result<u64, AppError> {
        Ok(self
            .delete_likes_where(|l| l.user_id == user_id && l.product_id == product_id)
            .await)
    }

    async fn delete_all_likes(&self) -> Result<u64, AppError> {
        Ok(self.delete_likes_where(|_| true).await)
    }
}

impl MemoryStore {
    async fn delete_likes_where<F>(&self, pred: F) -> u64
    where
        F: Fn(&Like) -> bool,
    {
        let mut inner = self.inner.write().await;
        let before = inner.likes.len();
        inner.likes.retain(|_, like| !pred(like));
        (before - inner.likes.len()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn search_matches_name_as_pattern() {
        let store = MemoryStore::new();
        store.insert_product(product("Deluxe Compass")).await.unwrap();
        store.insert_product(product("Pencil")).await.unwrap();

        let hits = store.search_products("Comp").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Deluxe Compass");

        // Case-sensitive like the original regex match.
        assert!(store.search_products("comp").await.unwrap().is_empty());
        assert_eq!(store.search_products("^P").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn liked_set_never_holds_duplicates() {
        let store = MemoryStore::new();
        let user = store.insert_user("alice", "", "hash").await.unwrap();

        assert!(store.add_liked_product(user.id, 7).await.unwrap());
        assert!(store.add_liked_product(user.id, 7).await.unwrap());
        assert!(!store.add_liked_product(999, 7).await.unwrap());

        let user = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(user.liked_products, vec![7]);
    }

    #[tokio::test]
    async fn decrement_is_floored_at_zero() {
        let store = MemoryStore::new();
        let p = store.insert_product(product("Ruler")).await.unwrap();
        store.increment_product_likes(p.id).await.unwrap();

        assert_eq!(store.decrement_product_likes(p.id, 5).await.unwrap(), Some(0));
        assert_eq!(store.decrement_product_likes(404, 1).await.unwrap(), None);
    }
}
