use crate::models::{NewPost, Post, PostUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /posts`.
///
/// Text fields are optional at the wire level so that a missing or `null`
/// field is reported by post validation rather than as a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Body of `PUT`/`PATCH /posts/:id`. Absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub date: String,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
            author: req.author.unwrap_or_default(),
            date: req.date,
        }
    }
}

impl From<UpdatePostRequest> for PostUpdate {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            author: req.author,
            date: req.date,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author: post.author,
            date: post.date.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use validator::Validate;

    #[test]
    fn test_create_request_missing_and_null_fields_fail_validation() {
        let req: CreatePostRequest =
            serde_json::from_value(json!({ "title": "T", "content": null })).unwrap();
        let new_post = NewPost::from(req);
        let errors = new_post.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("content"));
        assert!(fields.contains_key("author"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_update_request_allows_absent_fields() {
        let req: UpdatePostRequest =
            serde_json::from_value(json!({ "title": "T2", "author": null })).unwrap();

        let update = PostUpdate::from(req);
        assert!(update.validate().is_ok());
        assert_eq!(update.title.as_deref(), Some("T2"));
        assert!(update.content.is_none());
        assert!(update.author.is_none());
    }

    #[test]
    fn test_update_request_rejects_empty_supplied_field() {
        let req: UpdatePostRequest = serde_json::from_value(json!({ "content": "" })).unwrap();
        assert!(PostUpdate::from(req).validate().is_err());
    }

    #[test]
    fn test_update_request_ignores_id() {
        let req: UpdatePostRequest =
            serde_json::from_value(json!({ "id": "other", "_id": "other", "title": "T2" }))
                .unwrap();
        assert_eq!(PostUpdate::from(req).title.as_deref(), Some("T2"));
    }

    #[test]
    fn test_response_renders_date_as_rfc3339() {
        let post = Post::new(NewPost {
            title: "T".to_string(),
            content: "C".to_string(),
            author: "u1".to_string(),
            date: None,
        });
        let response = PostResponse::from(post.clone());

        assert_eq!(response.id, post.id);
        assert_eq!(
            DateTime::parse_from_rfc3339(&response.date).unwrap(),
            post.date
        );
    }
}
