// Configuration module entry point
// Merges defaults, settings file, environment and command line into one Config

mod state;
mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig};

/// Values given explicitly on the command line; they win over every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from an optional settings file plus `DIRSERVE_*` env vars
    ///
    /// A missing settings file is not an error; the defaults below apply.
    pub fn load_from(
        settings_file: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".dirserve")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "dirserve")?;

        if let Some(path) = settings_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("DIRSERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "server.root",
                overrides
                    .root
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.logging.validate().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// The served root must exist as a directory before the server starts
    pub fn check_root(&self) -> Result<(), String> {
        let root = &self.server.root;
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(format!(
                "Config directory '{}' is not a directory",
                root.display()
            )),
            Err(e) => Err(format!(
                "Config directory '{}' not found: {e}",
                root.display()
            )),
        }
    }
}
