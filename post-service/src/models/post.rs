use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::{self, doc, Document};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A blog post as persisted in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    /// Identifier of the authoring user.
    pub author: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
}

/// Fields supplied when creating a post. Text fields must not be blank.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPost {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[validate(custom(function = "not_blank"))]
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

/// A partial replacement of a post's mutable fields. `None` leaves a field as is;
/// a supplied text field must not be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PostUpdate {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Rejects empty and whitespace-only text.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

impl Post {
    /// Builds a post with a fresh id. `date` defaults to now, truncated to the
    /// millisecond precision the store keeps.
    pub fn new(new_post: NewPost) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: new_post.title,
            content: new_post.content,
            author: new_post.author,
            date: new_post.date.unwrap_or_else(Utc::now).trunc_subsecs(3),
        }
    }

    pub fn apply(&mut self, update: PostUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if let Some(date) = update.date {
            self.date = date.trunc_subsecs(3);
        }
    }
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none() && self.date.is_none()
    }

    /// The `$set` body for this update, containing only the supplied fields.
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(title) = &self.title {
            set.insert("title", title.as_str());
        }
        if let Some(content) = &self.content {
            set.insert("content", content.as_str());
        }
        if let Some(author) = &self.author {
            set.insert("author", author.as_str());
        }
        if let Some(date) = self.date {
            set.insert("date", bson::DateTime::from_chrono(date));
        }
        set
    }
}
