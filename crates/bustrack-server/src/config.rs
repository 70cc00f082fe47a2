//! Server configuration.
//!
//! Everything comes from environment variables (a `.env` file is
//! loaded at startup if present):
//!
//! - `BUSTRACK_PORT` (or legacy `PORT`) - listen port, default 3000
//! - `BUSTRACK_DATA_DIR` - collection directory, default `./data`
//! - `BUSTRACK_ADMIN_PASSWORD` - administrator shared secret

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default listen port, matching the original deployment.
const DEFAULT_PORT: u16 = 3000;

/// Default location of the collection files.
const DEFAULT_DATA_DIR: &str = "./data";

/// Fallback administrator password for drop-in compatibility with
/// existing deployments. Override it in any real install.
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("BUSTRACK_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_dir = std::env::var("BUSTRACK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let admin_password = std::env::var("BUSTRACK_ADMIN_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        Self {
            port,
            data_dir,
            admin_password,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:3000");
    }
}
