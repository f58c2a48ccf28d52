//! Database schemas for Bloglist
//!
//! Defines MongoDB document structures for blogs.

mod blog;
mod metadata;

pub use blog::{BlogDoc, BLOG_COLLECTION};
pub use metadata::Metadata;
