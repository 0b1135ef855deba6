//! HTTP protocol layer module
//!
//! Response builders shared by the config handler, decoupled from lookup logic.

pub mod response;

// Re-export commonly used types
pub use response::{build_error_response, build_json_response};
