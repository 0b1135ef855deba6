//! Lookup errors and their HTTP mapping

use hyper::StatusCode;
use thiserror::Error;

/// Why a config lookup failed
///
/// `Display` carries the underlying cause for the error log; clients only
/// ever see [`LookupError::public_message`].
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("path is required")]
    BadRequest,

    #[error("request path is not valid UTF-8: {0}")]
    InvalidPath(#[from] std::string::FromUtf8Error),

    #[error("config directory not found")]
    DirectoryNotFound,

    #[error("error reading config directory: {0}")]
    ReadDirectory(#[source] std::io::Error),

    #[error("no JSON file found in config directory")]
    NoJsonFile,

    #[error("error reading config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid JSON format: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl LookupError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest | Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::DirectoryNotFound | Self::NoJsonFile => StatusCode::NOT_FOUND,
            Self::ReadDirectory(_) | Self::ReadFile(_) | Self::InvalidJson(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text response body
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Path is required",
            Self::InvalidPath(_) => "Invalid request path",
            Self::DirectoryNotFound => "Config directory not found",
            Self::ReadDirectory(_) => "Error reading config directory",
            Self::NoJsonFile => "No JSON file found in config directory",
            Self::ReadFile(_) => "Error reading config file",
            // Bad data on disk, still reported as a server error
            Self::InvalidJson(_) => "Invalid JSON format",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}
