//! Database layer for Bloglist
//!
//! Provides MongoDB storage for blog documents.

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection};
pub use schemas::{BlogDoc, Metadata};
