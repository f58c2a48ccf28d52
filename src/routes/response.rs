//! Response helpers shared by all routes

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::types::BloglistError;

pub type FullBody = Full<Bytes>;

/// Error body returned for every non-2xx JSON response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn with_status(status: StatusCode, body: Bytes) -> Response<FullBody> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<FullBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = with_status(status, Bytes::from(json));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Response with no body, e.g. 204 after a delete
pub fn empty_response(status: StatusCode) -> Response<FullBody> {
    with_status(status, Bytes::new())
}

pub fn error_response(status: StatusCode, error: &str) -> Response<FullBody> {
    json_response(
        status,
        &ErrorResponse {
            error: error.to_string(),
        },
    )
}

impl From<BloglistError> for Response<FullBody> {
    fn from(err: BloglistError) -> Self {
        let (status, body) = err.into_status_code_and_body();
        error_response(status, &body)
    }
}

/// 404 for any path/method no route claims
pub fn unknown_endpoint() -> Response<FullBody> {
    error_response(StatusCode::NOT_FOUND, "unknown endpoint")
}

/// CORS preflight response
pub fn preflight_response() -> Response<FullBody> {
    let mut response = empty_response(StatusCode::OK);
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    response
}
