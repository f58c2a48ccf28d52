//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::repo::BlogRepository;
use crate::routes::{self, response::FullBody, BLOGS_PATH};
use crate::types::BloglistError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Blog storage (MongoDB, or in-memory in dev mode and tests)
    pub blogs: Arc<dyn BlogRepository>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, blogs: Arc<dyn BlogRepository>) -> Self {
        Self {
            args,
            blogs,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server on the configured address and run until Ctrl-C
pub async fn run(state: Arc<AppState>) -> Result<(), BloglistError> {
    let listener = TcpListener::bind(state.args.listen).await?;
    serve(listener, state, shutdown_signal()).await
}

/// Accept connections on `listener` until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), BloglistError>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    info!(
        "Bloglist listening on {} (store: {})",
        local_addr,
        state.blogs.backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);

                            let service = service_fn(move |req| {
                                let state = Arc::clone(&state);
                                async move { handle_request(state, addr, req).await }
                            });

                            if let Err(err) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!("Error serving connection from {}: {:?}", addr, err);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {:?}", e);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Route incoming HTTP requests
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Result<Response<FullBody>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        (Method::GET, "/health") | (Method::GET, "/healthz") => routes::health_check(&state).await,

        (Method::GET, "/version") => routes::version_info(),

        (Method::OPTIONS, _) => routes::preflight_response(),

        (_, p) if p == BLOGS_PATH || p.starts_with("/api/blogs/") => {
            routes::handle_blogs_request(req, Arc::clone(&state), &path).await
        }

        _ => routes::unknown_endpoint(),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryBlogRepository;
    use clap::Parser;
    use http_body_util::{BodyExt, Full};
    use hyper::StatusCode;
    use serde_json::{json, Value};

    fn test_state() -> Arc<AppState> {
        let args = Args::parse_from(["bloglist", "--listen", "127.0.0.1:0"]);
        Arc::new(AppState::new(args, Arc::new(MemoryBlogRepository::new())))
    }

    fn addr() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Bytes) {
        let bytes = body
            .map(|b| Bytes::from(b.to_string()))
            .unwrap_or_default();
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Full::new(bytes))
            .unwrap();

        let resp = handle_request(Arc::clone(state), addr(), req).await.unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();
        let (status, content_type, body) = send(
            &state,
            Method::POST,
            "/api/blogs",
            Some(json!({
                "title": "Test title3",
                "author": "Daniel3",
                "url": "http://localhost:3003",
                "likes": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let created: Value = serde_json::from_slice(&body).unwrap();
        assert!(created["id"].is_string());

        let (status, _, body) = send(&state, Method::GET, "/api/blogs", None).await;
        assert_eq!(status, StatusCode::OK);
        let blogs: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0]["author"], "Daniel3");
    }

    #[tokio::test]
    async fn test_create_without_title_and_url_is_bad_request() {
        let state = test_state();
        let (status, _, body) = send(
            &state,
            Method::POST,
            "/api/blogs",
            Some(json!({ "author": "Daniel3", "likes": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"].as_str().unwrap().contains("title"));
        assert_eq!(state.blogs.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let state = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/blogs")
            .body(Full::new(Bytes::from_static(b"{not json")))
            .unwrap();
        let resp = handle_request(state, addr(), req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_unknown_and_malformed_ids() {
        let state = test_state();
        let unknown = format!("/api/blogs/{}", bson::oid::ObjectId::new().to_hex());
        let (status, _, _) = send(&state, Method::PUT, &unknown, Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) =
            send(&state, Method::PUT, "/api/blogs/123", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_returns_no_content_even_when_missing() {
        let state = test_state();
        let unknown = format!("/api/blogs/{}", bson::oid::ObjectId::new().to_hex());
        let (status, content_type, body) = send(&state, Method::DELETE, &unknown, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(content_type.is_none());
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_get_single_blog() {
        let state = test_state();
        let (_, _, body) = send(
            &state,
            Method::POST,
            "/api/blogs",
            Some(json!({ "title": "One", "url": "http://one" })),
        )
        .await;
        let created: Value = serde_json::from_slice(&body).unwrap();
        let uri = format!("/api/blogs/{}", created["id"].as_str().unwrap());

        let (status, _, body) = send(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched["likes"], 0);
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let state = test_state();
        let (status, _, body) = send(&state, Method::GET, "/api/blogsx", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"], "unknown endpoint");

        let (status, _, _) = send(&state, Method::PATCH, "/api/blogs", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let state = test_state();
        let (status, _, body) = send(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        let health: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(health["healthy"], true);
        assert_eq!(health["store"], "memory");
        assert_eq!(health["blogs"], 0);
    }
}
