//! In-memory blog repository
//!
//! Used when running in dev mode without MongoDB, and as the store behind
//! the HTTP test suite. IDs are real `ObjectId`s so clients cannot tell the
//! difference.

use bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{BlogPatch, BlogRepository, NewBlog};
use crate::db::BlogDoc;
use crate::types::{BloglistError, Result};

/// Blog repository held entirely in process memory
#[derive(Default)]
pub struct MemoryBlogRepository {
    blogs: RwLock<Vec<BlogDoc>>,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        warn!("Blog repository running in memory-only mode (no MongoDB)");
        Self::default()
    }
}

#[async_trait::async_trait]
impl BlogRepository for MemoryBlogRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<BlogDoc>> {
        Ok(self.blogs.read().await.clone())
    }

    async fn create(&self, blog: NewBlog) -> Result<BlogDoc> {
        let mut doc = blog.into_doc()?;
        doc._id = Some(ObjectId::new());

        self.blogs.write().await.push(doc.clone());
        debug!("Memory store: inserted blog {}", doc.id_hex());
        Ok(doc)
    }

    async fn get(&self, id: ObjectId) -> Result<BlogDoc> {
        self.blogs
            .read()
            .await
            .iter()
            .find(|b| b._id == Some(id))
            .cloned()
            .ok_or_else(|| BloglistError::NotFound(format!("blog {}", id)))
    }

    async fn update(&self, id: ObjectId, patch: BlogPatch) -> Result<BlogDoc> {
        patch.validate()?;

        let mut blogs = self.blogs.write().await;
        let blog = blogs
            .iter_mut()
            .find(|b| b._id == Some(id))
            .ok_or_else(|| BloglistError::NotFound(format!("blog {}", id)))?;

        patch.apply_to(blog);
        Ok(blog.clone())
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let mut blogs = self.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b._id != Some(id));
        Ok(blogs.len() < before)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.blogs.read().await.len() as u64)
    }

    async fn clear(&self) -> Result<()> {
        self.blogs.write().await.clear();
        Ok(())
    }
}
