//! HTTP response building module
//!
//! Provides builders for success and plain-text error responses.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, SERVER, X_CONTENT_TYPE_OPTIONS};
use hyper::{Response, StatusCode};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build 200 response carrying the file bytes untouched
pub fn build_json_response(
    data: Bytes,
    content_type: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(SERVER, server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(StatusCode::OK, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text error response
pub fn build_error_response(
    status: StatusCode,
    message: &'static str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(message.as_bytes())
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .header(CONTENT_LENGTH, message.len())
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(SERVER, server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            let mut fallback = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
            *fallback.status_mut() = status;
            fallback
        })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp = build_json_response(
            Bytes::from_static(br#"{"x":1}"#),
            "application/json",
            "dirserve",
            false,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "7");
        assert_eq!(resp.headers()[SERVER], "dirserve");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(br#"{"x":1}"#));
    }

    #[tokio::test]
    async fn test_head_keeps_length() {
        let resp = build_json_response(
            Bytes::from_static(b"[1,2]"),
            "application/json",
            "dirserve",
            true,
        );
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_response() {
        let resp = build_error_response(
            StatusCode::NOT_FOUND,
            "Config directory not found",
            "dirserve",
            false,
        );
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(resp.headers()[X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(
            body_bytes(resp).await,
            Bytes::from_static(b"Config directory not found")
        );
    }
}
