//! HTTP server for Bloglist

pub mod http;

pub use http::{handle_request, run, serve, AppState};
