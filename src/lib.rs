//! Bloglist - REST API for a list of blogs
//!
//! Blogs are stored in MongoDB (or in memory in dev mode) and exposed under
//! `/api/blogs` with create, list, get, update and delete operations.
//!
//! ## Layers
//!
//! - **db**: MongoDB client and the blog document schema
//! - **repo**: `BlogRepository` trait with MongoDB and in-memory stores
//! - **routes**: HTTP handlers, validation and response shaping
//! - **server**: hyper accept loop and top-level routing

pub mod config;
pub mod db;
pub mod repo;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{BloglistError, Result};
