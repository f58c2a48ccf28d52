//! Blog repository
//!
//! `BlogRepository` is the storage seam for blog records. The HTTP layer
//! only ever talks to an `Arc<dyn BlogRepository>`, so MongoDB can be swapped
//! for the in-memory store (dev mode, tests) without touching the handlers.
//!
//! Validation of incoming fields lives here too, so every implementation
//! enforces the same record invariants:
//!
//! - `title` and `url` are present and non-empty
//! - `likes` is a non-negative integer (0 when omitted on create)

mod memory;
mod mongo;

pub use memory::MemoryBlogRepository;
pub use mongo::MongoBlogRepository;

use bson::{doc, oid::ObjectId, Document};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::db::BlogDoc;
use crate::types::{BloglistError, Result};

/// Storage operations for blog records
#[async_trait::async_trait]
pub trait BlogRepository: Send + Sync {
    /// Short name of the backing store, reported by /health
    fn backend(&self) -> &'static str;

    /// All stored blogs, in no particular order
    async fn list(&self) -> Result<Vec<BlogDoc>>;

    /// Validate and persist a new blog, returning it with its assigned ID
    async fn create(&self, blog: NewBlog) -> Result<BlogDoc>;

    /// Fetch one blog, or `NotFound`
    async fn get(&self, id: ObjectId) -> Result<BlogDoc>;

    /// Replace the supplied fields of an existing blog, or `NotFound`
    async fn update(&self, id: ObjectId, patch: BlogPatch) -> Result<BlogDoc>;

    /// Remove a blog. Returns whether anything was removed; a missing ID is not an error.
    async fn delete(&self, id: ObjectId) -> Result<bool>;

    async fn count(&self) -> Result<u64>;

    /// Remove every blog
    async fn clear(&self) -> Result<()>;
}

/// Parse a path segment into a blog ID
pub fn parse_blog_id(raw: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(raw)?)
}

/// Fields accepted when creating a blog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlog {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_likes")]
    pub likes: Option<i64>,
}

impl NewBlog {
    /// Check required fields and build the document to store
    pub fn into_doc(self) -> Result<BlogDoc> {
        let title = required("title", self.title)?;
        let url = required("url", self.url)?;
        let likes = self.likes.unwrap_or(0);
        check_likes(likes)?;

        Ok(BlogDoc::new(title, self.author, url, likes))
    }
}

/// Fields accepted when updating a blog; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_likes")]
    pub likes: Option<i64>,
}

impl BlogPatch {
    /// Reject supplied fields that would break record invariants
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            non_empty("title", title)?;
        }
        if let Some(url) = &self.url {
            non_empty("url", url)?;
        }
        if let Some(likes) = self.likes {
            check_likes(likes)?;
        }
        Ok(())
    }

    /// Apply the supplied fields to a document in place
    pub fn apply_to(&self, blog: &mut BlogDoc) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(author) = &self.author {
            blog.author = Some(author.clone());
        }
        if let Some(url) = &self.url {
            blog.url = url.clone();
        }
        if let Some(likes) = self.likes {
            blog.likes = likes;
        }
        blog.metadata.touch();
    }

    /// `$set` body for the supplied fields
    pub fn to_set_document(&self) -> Document {
        let mut set_doc = doc! { "metadata.updated_at": bson::DateTime::now() };

        if let Some(title) = &self.title {
            set_doc.insert("title", title.as_str());
        }
        if let Some(author) = &self.author {
            set_doc.insert("author", author.as_str());
        }
        if let Some(url) = &self.url {
            set_doc.insert("url", url.as_str());
        }
        if let Some(likes) = self.likes {
            set_doc.insert("likes", likes);
        }

        set_doc
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) => {
            non_empty(field, &v)?;
            Ok(v)
        }
        None => Err(BloglistError::Validation(format!("{field} is required"))),
    }
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BloglistError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_likes(likes: i64) -> Result<()> {
    if likes < 0 {
        return Err(BloglistError::Validation(format!(
            "likes must be non-negative, got {likes}"
        )));
    }
    Ok(())
}

/// Clients send likes either as a number or as a numeric string ("1").
#[derive(Deserialize)]
#[serde(untagged)]
enum LikesInput {
    Count(i64),
    Text(String),
}

fn deserialize_likes<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<LikesInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(LikesInput::Count(n)) => Ok(Some(n)),
        Some(LikesInput::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("likes must be an integer, got {s:?}"))),
    }
}
