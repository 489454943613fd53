use crate::config::NotFoundPolicy;
use crate::dtos::{CreatePostRequest, PostResponse, UpdatePostRequest};
use crate::handlers::PostError;
use crate::models::{NewPost, Post, PostUpdate};
use crate::services::metrics::record_operation;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

#[tracing::instrument(skip(state, request))]
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>, PostError> {
    let new_post = NewPost::from(request);
    if let Err(e) = new_post.validate() {
        record_operation("create", "invalid");
        return Err(e.into());
    }

    let post = state.store.create_post(new_post).await.map_err(|e| {
        record_operation("create", "error");
        e
    })?;

    record_operation("create", "ok");
    tracing::info!(post_id = %post.id, author = %post.author, "Post created");

    Ok(Json(PostResponse::from(post)))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Option<PostResponse>>, PostError> {
    let update = PostUpdate::from(request);
    if let Err(e) = update.validate() {
        record_operation("update", "invalid");
        return Err(e.into());
    }

    let post = state
        .store
        .update_post(&post_id, update)
        .await
        .map_err(|e| {
            record_operation("update", "error");
            e
        })?;

    if post.is_some() {
        tracing::info!(post_id = %post_id, "Post updated");
    }

    respond("update", post_id, post, state.not_found_policy)
}

#[tracing::instrument(skip(state))]
pub async fn find_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Option<PostResponse>>, PostError> {
    let post = state.store.find_post(&post_id).await.map_err(|e| {
        record_operation("find", "error");
        e
    })?;

    respond("find", post_id, post, state.not_found_policy)
}

fn respond(
    operation: &'static str,
    post_id: String,
    post: Option<Post>,
    policy: NotFoundPolicy,
) -> Result<Json<Option<PostResponse>>, PostError> {
    match (post, policy) {
        (Some(post), _) => {
            record_operation(operation, "ok");
            Ok(Json(Some(PostResponse::from(post))))
        }
        (None, NotFoundPolicy::Null) => {
            record_operation(operation, "not_found");
            Ok(Json(None))
        }
        (None, NotFoundPolicy::Status) => {
            record_operation(operation, "not_found");
            Err(PostError::NotFound(post_id))
        }
    }
}
