//! Shared types for Bloglist

pub mod error;

pub use error::{BloglistError, Result};
