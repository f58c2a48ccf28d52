//! Blog document schema
//!
//! One document per blog post in the `blogs` collection.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::mongo::MutMetadata;
use crate::db::schemas::Metadata;

/// Collection name for blogs
pub const BLOG_COLLECTION: &str = "blogs";

/// Blog document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BlogDoc {
    /// MongoDB document ID, assigned by the store on insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Post title, never empty
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Link to the post, never empty
    pub url: String,

    /// Non-negative like count
    #[serde(default)]
    pub likes: i64,
}

impl BlogDoc {
    /// Create a new, not yet persisted, blog document
    pub fn new(title: String, author: Option<String>, url: String, likes: i64) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            title,
            author,
            url,
            likes,
        }
    }

    /// Hex form of the document ID, empty until the document is stored
    pub fn id_hex(&self) -> String {
        self._id.map(|o| o.to_hex()).unwrap_or_default()
    }
}

impl MutMetadata for BlogDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
