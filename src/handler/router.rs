//! Request dispatch module
//!
//! Entry point for HTTP request processing: decodes the path, runs the config
//! lookup, turns the outcome into a response and writes the access log.

use super::config_files::ConfigDocument;
use super::error::LookupError;
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext {
    pub method: Method,
    /// Raw path as received, before percent-decoding
    pub path: String,
    pub is_head: bool,
}

impl RequestContext {
    fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            is_head: req.method() == Method::HEAD,
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Every method is served; HEAD answers with headers only.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req);
    let access_entry = state
        .access_log()
        .then(|| AccessLogEntry::from_request(peer_addr, &req));
    drop(req);

    let response = serve_config(&ctx, &state).await;

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = sent_length(&response, ctx.is_head);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run the lookup and build the matching response
async fn serve_config(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    match lookup(&ctx.path, state).await {
        Ok(doc) => {
            logger::log_debug(&format!(
                "{} {} -> {}",
                ctx.method,
                ctx.path,
                doc.path.display()
            ));
            let content_type = doc.content_type();
            http::build_json_response(
                Bytes::from(doc.data),
                content_type,
                state.server_name(),
                ctx.is_head,
            )
        }
        Err(err) => {
            if err.is_server_error() {
                logger::log_error(&format!("{} {}: {err}", ctx.method, ctx.path));
            } else {
                logger::log_debug(&format!("{} {}: {err}", ctx.method, ctx.path));
            }
            http::build_error_response(
                err.status(),
                err.public_message(),
                state.server_name(),
                ctx.is_head,
            )
        }
    }
}

async fn lookup(raw_path: &str, state: &AppState) -> Result<ConfigDocument, LookupError> {
    let path = urlencoding::decode(raw_path)?;
    state.handler.handle(&path).await
}

/// Body bytes actually sent; HEAD announces a length but sends nothing
fn sent_length(response: &Response<Full<Bytes>>, is_head: bool) -> usize {
    if is_head {
        return 0;
    }
    response
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
