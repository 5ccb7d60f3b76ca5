//! Client configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::types::TICK_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Directory images are fetched from, by display name.
    pub asset_dir: PathBuf,
    pub asset_index: PathBuf,
    pub tick_ms: u32,
    pub log_path: Option<PathBuf>,
    /// Skip the server connection and only render the starfield.
    pub offline: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            asset_dir: PathBuf::from("assets"),
            asset_index: PathBuf::from("assets").join("index.json"),
            tick_ms: TICK_MS,
            log_path: None,
            offline: false,
        }
    }
}

impl ClientConfig {
    /// Read `IEV_*` variables; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let host = non_empty("IEV_SERVER_HOST").unwrap_or(defaults.host);
        let port = non_empty("IEV_SERVER_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let asset_dir = non_empty("IEV_ASSET_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.asset_dir);
        let asset_index = non_empty("IEV_ASSET_INDEX")
            .map(PathBuf::from)
            .unwrap_or_else(|| asset_dir.join("index.json"));
        let tick_ms = non_empty("IEV_TICK_MS")
            .and_then(|s| s.parse().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(defaults.tick_ms);
        let log_path = non_empty("IEV_LOG_PATH").map(PathBuf::from);
        let offline = non_empty("IEV_OFFLINE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host,
            port,
            asset_dir,
            asset_index,
            tick_ms,
            log_path,
            offline,
        }
    }

    /// `host:port`, resolved at connect time.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
