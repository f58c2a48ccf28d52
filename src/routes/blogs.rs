//! Blog API endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/blogs` - List all blogs
//! - `POST /api/blogs` - Create a blog (400 without title or url)
//! - `GET /api/blogs/{id}` - Get one blog
//! - `PUT /api/blogs/{id}` - Replace the supplied fields of a blog
//! - `DELETE /api/blogs/{id}` - Delete a blog (204 even if it was already gone)
//!
//! Records go out as `{id, title, author, url, likes}`; the store's `_id`
//! and metadata never leave this module.

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

use super::response::{empty_response, json_response, unknown_endpoint, FullBody};
use crate::db::BlogDoc;
use crate::repo::{parse_blog_id, BlogPatch, NewBlog};
use crate::server::AppState;
use crate::types::{BloglistError, Result};

/// Path prefix owned by this module
pub const BLOGS_PATH: &str = "/api/blogs";

/// Blog as seen by API clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
}

impl From<BlogDoc> for BlogResponse {
    fn from(blog: BlogDoc) -> Self {
        Self {
            id: blog.id_hex(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        }
    }
}

/// Main handler for /api/blogs routes
pub async fn handle_blogs_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    path: &str,
) -> Response<FullBody>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let method = req.method().clone();
    let subpath = path.strip_prefix(BLOGS_PATH).unwrap_or("");

    let result = match (method, subpath) {
        (Method::GET, "" | "/") => list_blogs(&state).await,
        (Method::POST, "" | "/") => create_blog(req, &state).await,
        (method, p) => match blog_id_segment(p) {
            Some(id) => match method {
                Method::GET => get_blog(&state, id).await,
                Method::PUT => update_blog(req, &state, id).await,
                Method::DELETE => delete_blog(&state, id).await,
                _ => return unknown_endpoint(),
            },
            None => return unknown_endpoint(),
        },
    };

    result.unwrap_or_else(|err| {
        if matches!(err, BloglistError::Database(_) | BloglistError::Internal(_)) {
            warn!("Blog request failed: {}", err);
        }
        err.into()
    })
}

/// `/{id}` -> `id`; anything with further segments is not ours
fn blog_id_segment(subpath: &str) -> Option<&str> {
    let id = subpath.strip_prefix('/')?.trim_end_matches('/');
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

async fn read_json<B, T>(req: Request<B>) -> Result<T>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
    T: DeserializeOwned,
{
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| BloglistError::BadRequest(format!("Invalid body: {e}")))?
        .to_bytes();

    Ok(serde_json::from_slice(&body)?)
}

/// GET /api/blogs
async fn list_blogs(state: &AppState) -> Result<Response<FullBody>> {
    let blogs: Vec<BlogResponse> = state
        .blogs
        .list()
        .await?
        .into_iter()
        .map(BlogResponse::from)
        .collect();

    Ok(json_response(StatusCode::OK, &blogs))
}

/// POST /api/blogs
async fn create_blog<B>(req: Request<B>, state: &AppState) -> Result<Response<FullBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let new_blog: NewBlog = read_json(req).await?;
    let created = state.blogs.create(new_blog).await?;

    info!("Created blog {} ({:?})", created.id_hex(), created.title);
    Ok(json_response(
        StatusCode::CREATED,
        &BlogResponse::from(created),
    ))
}

/// GET /api/blogs/{id}
async fn get_blog(state: &AppState, id: &str) -> Result<Response<FullBody>> {
    let oid = parse_blog_id(id)?;
    let blog = state.blogs.get(oid).await?;
    Ok(json_response(StatusCode::OK, &BlogResponse::from(blog)))
}

/// PUT /api/blogs/{id}
async fn update_blog<B>(req: Request<B>, state: &AppState, id: &str) -> Result<Response<FullBody>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let oid = parse_blog_id(id)?;
    let patch: BlogPatch = read_json(req).await?;
    let updated = state.blogs.update(oid, patch).await?;

    info!("Updated blog {}", id);
    Ok(json_response(StatusCode::OK, &BlogResponse::from(updated)))
}

/// DELETE /api/blogs/{id}
async fn delete_blog(state: &AppState, id: &str) -> Result<Response<FullBody>> {
    let oid = parse_blog_id(id)?;
    if state.blogs.delete(oid).await? {
        info!("Deleted blog {}", id);
    } else {
        info!("Delete of unknown blog {} (nothing to do)", id);
    }
    Ok(empty_response(StatusCode::NO_CONTENT))
}
