//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::{DateTime, Local};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Version};
use std::net::SocketAddr;

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Raw (still percent-encoded) request path
    pub path: String,
    /// Query string without leading `?`
    pub query: Option<String>,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Capture the request side; status, size and timing are filled in later
    pub fn from_request<B>(remote_addr: SocketAddr, req: &Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            remote_addr: remote_addr.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: version_str(req.version()),
            status: 200,
            body_bytes: 0,
            referer: header(REFERER),
            user_agent: header(USER_AGENT),
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$status`,
    /// `$body_bytes_sent`, `$http_referer`, `$http_user_agent`,
    /// `$request_time` (seconds, 3 decimal places).
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // Longer names first: $request_time and $request_uri before $request
        let vars = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".into())),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".into()),
            ),
        ];

        vars.iter()
            .fold(pattern.to_string(), |acc, (name, value)| acc.replace(name, value))
    }
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let req = Request::builder()
            .method("GET")
            .uri("/app1?verbose=1")
            .header("referer", "https://example.com")
            .header("user-agent", "curl/8.5.0")
            .body(())
            .unwrap();
        let mut entry = AccessLogEntry::from_request("192.168.1.1:53000".parse().unwrap(), &req);
        entry.status = 200;
        entry.body_bytes = 7;
        entry.request_time_us = 1_250_000;
        entry
    }

    #[test]
    fn test_from_request() {
        let entry = create_test_entry();
        assert_eq!(entry.remote_addr, "192.168.1.1");
        assert_eq!(entry.path, "/app1");
        assert_eq!(entry.query.as_deref(), Some("verbose=1"));
        assert_eq!(entry.http_version, "1.1");
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /app1?verbose=1 HTTP/1.1\" 200 7"));
        assert!(log.ends_with("\"https://example.com\" \"curl/8.5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("\"GET /app1?verbose=1 HTTP/1.1\" 200 7"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 7);
        assert_eq!(value["query"], "verbose=1");
    }

    #[test]
    fn test_format_json_missing_headers() {
        let req = Request::builder().uri("/x").body(()).unwrap();
        let entry = AccessLogEntry::from_request("127.0.0.1:1".parse().unwrap(), &req);
        let value: serde_json::Value = serde_json::from_str(&entry.format("json")).unwrap();
        assert!(value["referer"].is_null());
        assert!(value["query"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$remote_addr $request_uri $status $request_time");
        assert_eq!(log, "192.168.1.1 /app1?verbose=1 200 1.250");
    }
}
