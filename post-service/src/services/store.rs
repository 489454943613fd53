//! Persistence operations for posts.
//!
//! `PostStore` is the seam between the HTTP handlers and whatever holds the
//! data. Every operation resolves exactly once: `Ok(Some(post))` when a post
//! matched, `Ok(None)` when none did, and `Err` only when the store itself
//! failed. Absence is never reported as an error. Posts with blank text
//! fields are rejected before anything is written.

use crate::models::{NewPost, Post, PostUpdate};
use crate::services::MongoDb;
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use thiserror::Error;
use validator::Validate;

/// Failure reported by the persistence layer, forwarded untouched to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post and return it with its assigned id and date.
    async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError>;

    /// Apply `update` to the post with `id` and return its post-update state.
    async fn update_post(&self, id: &str, update: PostUpdate) -> Result<Option<Post>, StoreError>;

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// `PostStore` backed by the `posts` collection.
#[derive(Clone)]
pub struct MongoPostStore {
    db: MongoDb,
}

impl MongoPostStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        new_post.validate()?;
        let post = Post::new(new_post);

        self.db.posts().insert_one(&post, None).await.map_err(|e| {
            tracing::error!(post_id = %post.id, "Failed to insert post: {}", e);
            e
        })?;

        tracing::debug!(post_id = %post.id, "Post inserted");
        Ok(post)
    }

    async fn update_post(&self, id: &str, update: PostUpdate) -> Result<Option<Post>, StoreError> {
        update.validate()?;
        if update.is_empty() {
            return self.find_post(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let post = self
            .db
            .posts()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": update.to_set_document() },
                options,
            )
            .await
            .map_err(|e| {
                tracing::error!(post_id = %id, "Failed to update post: {}", e);
                e
            })?;

        Ok(post)
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let post = self
            .db
            .posts()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(post_id = %id, "Failed to find post: {}", e);
                e
            })?;

        Ok(post)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .health_check()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
