#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use post_service::config::NotFoundPolicy;
use post_service::models::{NewPost, Post, PostUpdate};
use post_service::services::{MemoryPostStore, PostStore, StoreError};
use post_service::startup::{build_router, AppState};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const STORE_ERROR_MESSAGE: &str = "Some error occured!";

/// What a `StubStore` answers to every call.
#[derive(Clone)]
pub enum Outcome {
    Found(Post),
    Absent,
    Fail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(NewPost),
    Update(String, PostUpdate),
    Find(String),
}

/// A store that records its calls and answers with a fixed outcome.
pub struct StubStore {
    outcome: Outcome,
    calls: Mutex<Vec<Call>>,
}

impl StubStore {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: Call) -> Result<Option<Post>, StoreError> {
        self.calls.lock().unwrap().push(call);
        match &self.outcome {
            Outcome::Found(post) => Ok(Some(post.clone())),
            Outcome::Absent => Ok(None),
            Outcome::Fail => Err(StoreError::Other(anyhow::anyhow!(STORE_ERROR_MESSAGE))),
        }
    }
}

#[async_trait]
impl PostStore for StubStore {
    async fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        let fallback = Post::new(new_post.clone());
        self.answer(Call::Create(new_post))
            .map(|post| post.unwrap_or(fallback))
    }

    async fn update_post(&self, id: &str, update: PostUpdate) -> Result<Option<Post>, StoreError> {
        self.answer(Call::Update(id.to_string(), update))
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        self.answer(Call::Find(id.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match self.outcome {
            Outcome::Fail => Err(StoreError::Unavailable(STORE_ERROR_MESSAGE.to_string())),
            _ => Ok(()),
        }
    }
}

pub fn app_with_store(store: Arc<dyn PostStore>, policy: NotFoundPolicy) -> Router {
    build_router(AppState::new(store, policy))
}

pub fn memory_app() -> (Router, MemoryPostStore) {
    let store = MemoryPostStore::new();
    let app = app_with_store(Arc::new(store.clone()), NotFoundPolicy::Status);
    (app, store)
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    let json = serde_json::from_slice(&body).expect("response body should be JSON");
    (status, json)
}

pub fn sample_post(id: &str) -> Post {
    let mut post = Post::new(NewPost {
        title: "My first test post".to_string(),
        content: "Random content".to_string(),
        author: "stswenguser".to_string(),
        date: None,
    });
    post.id = id.to_string();
    post
}
