use crate::services::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::ErrorResponse;
use thiserror::Error;

/// Outcome of a post request that did not produce a post.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => PostError::Validation(errors),
            other => PostError::Store(other),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        match self {
            PostError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Validation error".to_string(),
                    details: Some(err.to_string()),
                }),
            )
                .into_response(),
            PostError::NotFound(id) => {
                tracing::debug!(post_id = %id, "Post not found");
                StatusCode::NOT_FOUND.into_response()
            }
            // Store failures never leak detail to the caller.
            PostError::Store(err) => {
                tracing::error!(error = %err, "Post store error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPost;
    use validator::Validate;

    #[test]
    fn test_store_validation_maps_to_bad_request() {
        let errors = NewPost {
            title: String::new(),
            content: "C".to_string(),
            author: "u1".to_string(),
            date: None,
        }
        .validate()
        .unwrap_err();

        let err = PostError::from(StoreError::Validation(errors));
        assert!(matches!(err, PostError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_failure_maps_to_internal_error() {
        let err = PostError::from(StoreError::Unavailable("down".to_string()));
        assert!(matches!(err, PostError::Store(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
