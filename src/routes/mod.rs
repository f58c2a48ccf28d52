//! HTTP routes for Bloglist

pub mod blogs;
pub mod health;
pub mod response;

pub use blogs::{handle_blogs_request, BlogResponse, BLOGS_PATH};
pub use health::{health_check, version_info};
pub use response::{preflight_response, unknown_endpoint};
