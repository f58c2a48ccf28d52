//! MongoDB client and collection wrapper

use bson::{doc, oid::ObjectId, DateTime, Document};
use futures_util::TryStreamExt;
use mongodb::{
    options::{ReturnDocument, UpdateModifications},
    Client, Collection,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::db::schemas::Metadata;
use crate::types::BloglistError;

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect to MongoDB and verify the connection with a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, BloglistError> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| BloglistError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| BloglistError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub fn collection<T>(&self, name: &str) -> MongoCollection<T>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name)
    }

    /// Drop the whole database this client points at
    pub async fn drop_database(&self) -> Result<(), BloglistError> {
        info!("Dropping MongoDB database '{}'", self.db_name);
        self.client
            .database(&self.db_name)
            .drop()
            .await
            .map_err(|e| BloglistError::Database(format!("Drop failed: {}", e)))
    }

    /// Close the connection pool and stop the driver's background tasks.
    ///
    /// Collections handed out by this client must not be used afterwards.
    pub async fn close(self) {
        info!("Closing MongoDB connection to '{}'", self.db_name);
        self.client.shutdown().await;
    }
}

/// Typed MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + MutMetadata,
{
    fn new(client: &Client, db_name: &str, collection_name: &str) -> Self {
        let collection = client.database(db_name).collection::<T>(collection_name);
        MongoCollection { inner: collection }
    }

    /// Insert a document, setting metadata timestamps on `item` itself so the
    /// caller holds exactly what was stored
    pub async fn insert_one(&self, item: &mut T) -> Result<ObjectId, BloglistError> {
        let metadata = item.mut_metadata();
        let now = DateTime::now();
        metadata.created_at = Some(now);
        metadata.updated_at = Some(now);

        let result = self
            .inner
            .insert_one(&*item)
            .await
            .map_err(|e| BloglistError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| BloglistError::Database("Failed to get inserted ID".into()))
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, BloglistError> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| BloglistError::Database(format!("Find failed: {}", e)))
    }

    /// Find many documents by filter
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>, BloglistError> {
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| BloglistError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect::<Vec<T>>()
            .await
            .map_err(|e| BloglistError::Database(format!("Error reading documents: {}", e)))
    }

    /// Apply an update to one document and return it as it looks afterwards
    pub async fn find_one_and_update(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<Option<T>, BloglistError> {
        self.inner
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| BloglistError::Database(format!("Update failed: {}", e)))
    }

    /// Hard delete one document, returning how many were removed
    pub async fn delete_one(&self, filter: Document) -> Result<u64, BloglistError> {
        self.inner
            .delete_one(filter)
            .await
            .map(|r| r.deleted_count)
            .map_err(|e| BloglistError::Database(format!("Delete failed: {}", e)))
    }

    /// Hard delete every document matching the filter
    pub async fn delete_many(&self, filter: Document) -> Result<u64, BloglistError> {
        self.inner
            .delete_many(filter)
            .await
            .map(|r| r.deleted_count)
            .map_err(|e| BloglistError::Database(format!("Delete failed: {}", e)))
    }

    /// Count documents matching the filter
    pub async fn count(&self, filter: Document) -> Result<u64, BloglistError> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| BloglistError::Database(format!("Count failed: {}", e)))
    }
}
