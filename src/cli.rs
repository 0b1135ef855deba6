//! Command line interface

use crate::config::Overrides;
use clap::Parser;
use std::path::PathBuf;

/// Serve the first JSON file of each subdirectory over HTTP
#[derive(Parser, Debug)]
#[command(name = "dirserve")]
#[command(version)]
pub struct Cli {
    /// Directory to serve [default: .dirserve]
    #[arg(short = 'd', long, visible_alias = "directory", value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Listen port [default: 8080]
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Listen address [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Settings file (toml, json or yaml); skipped if it does not exist
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl Cli {
    /// Only flags actually given on the command line become overrides
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.config.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["dirserve"]).unwrap();
        let overrides = cli.overrides();
        assert!(overrides.root.is_none());
        assert!(overrides.port.is_none());
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "dirserve",
            "--config",
            "/srv/cfg",
            "--port",
            "9000",
            "--settings",
            "dirserve.toml",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.root, Some(PathBuf::from("/srv/cfg")));
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(cli.settings, Some(PathBuf::from("dirserve.toml")));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["dirserve", "-p", "8000", "-d", "/srv/cfg"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.port, Some(8000));
        assert_eq!(overrides.root, Some(PathBuf::from("/srv/cfg")));

        let cli = Cli::try_parse_from(["dirserve", "--directory", "cfg"]).unwrap();
        assert_eq!(cli.overrides().root, Some(PathBuf::from("cfg")));
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["dirserve", "--port", "http"]).is_err());
        assert!(Cli::try_parse_from(["dirserve", "--port", "70000"]).is_err());
    }

    #[test]
    fn test_command_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
