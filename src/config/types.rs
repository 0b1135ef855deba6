// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory whose subdirectories are served
    pub root: PathBuf,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Accepted values for `logging.level`
const LOG_LEVELS: [&str; 2] = ["info", "debug"];

impl LoggingConfig {
    pub fn is_debug(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug")
    }

    /// Reject levels the logger cannot honour
    pub fn validate(&self) -> Result<(), String> {
        if LOG_LEVELS
            .iter()
            .any(|level| self.level.eq_ignore_ascii_case(level))
        {
            Ok(())
        } else {
            Err(format!(
                "Unsupported logging.level '{}', expected one of: {}",
                self.level,
                LOG_LEVELS.join(", ")
            ))
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    /// Upper bound for serving a single connection
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(std::cmp::max(self.read_timeout, self.write_timeout))
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}
