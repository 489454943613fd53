use crate::models::{NewPost, Post, PostUpdate};
use crate::services::{PostStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use validator::Validate;

/// Process-local `PostStore` for development and tests. Contents are lost on exit.
#[derive(Clone, Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<HashMap<String, Post>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        new_post.validate()?;
        let post = Post::new(new_post);
        self.posts
            .write()
            .await
            .insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: &str, update: PostUpdate) -> Result<Option<Post>, StoreError> {
        update.validate()?;
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(id).map(|post| {
            post.apply(update);
            post.clone()
        }))
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
