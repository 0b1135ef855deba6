//! Request handler module
//!
//! Resolves request paths to config files under the served root and turns the
//! result into HTTP responses.

pub mod config_files;
pub mod error;
pub mod router;

// Re-export main entry point
pub use config_files::ConfigRequestHandler;
pub use router::handle_request;
