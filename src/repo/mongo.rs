//! MongoDB-backed blog repository

use bson::{doc, oid::ObjectId};
use tracing::debug;

use super::{BlogPatch, BlogRepository, NewBlog};
use crate::db::schemas::BLOG_COLLECTION;
use crate::db::{BlogDoc, MongoClient, MongoCollection};
use crate::types::{BloglistError, Result};

/// Blog repository persisting to the `blogs` collection
pub struct MongoBlogRepository {
    collection: MongoCollection<BlogDoc>,
}

impl MongoBlogRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<BlogDoc>(BLOG_COLLECTION),
        }
    }
}

#[async_trait::async_trait]
impl BlogRepository for MongoBlogRepository {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn list(&self) -> Result<Vec<BlogDoc>> {
        self.collection.find_many(doc! {}).await
    }

    async fn create(&self, blog: NewBlog) -> Result<BlogDoc> {
        let mut doc = blog.into_doc()?;
        let id = self.collection.insert_one(&mut doc).await?;
        doc._id = Some(id);

        debug!("Inserted blog {}", id);
        Ok(doc)
    }

    async fn get(&self, id: ObjectId) -> Result<BlogDoc> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| BloglistError::NotFound(format!("blog {}", id)))
    }

    async fn update(&self, id: ObjectId, patch: BlogPatch) -> Result<BlogDoc> {
        patch.validate()?;

        self.collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": patch.to_set_document() })
            .await?
            .ok_or_else(|| BloglistError::NotFound(format!("blog {}", id)))
    }

    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let deleted = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64> {
        self.collection.count(doc! {}).await
    }

    async fn clear(&self) -> Result<()> {
        let deleted = self.collection.delete_many(doc! {}).await?;
        debug!("Cleared {} blogs", deleted);
        Ok(())
    }
}
