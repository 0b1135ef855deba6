// Application state module
// Immutable state shared by every connection

use super::types::Config;
use crate::handler::ConfigRequestHandler;

/// Application state
pub struct AppState {
    pub config: Config,
    pub handler: ConfigRequestHandler,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let handler = ConfigRequestHandler::new(config.server.root.clone());
        Self { config, handler }
    }

    pub fn access_log(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn server_name(&self) -> &str {
        &self.config.http.server_name
    }
}
