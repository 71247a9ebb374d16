use std::env;
use std::net::SocketAddr;

use crate::error::ConfigError;
use crate::tmdb::TMDB_BASE;

pub const API_KEY_VAR: &str = "TMDB_API_KEY";
pub const BASE_URL_VAR: &str = "TMDB_BASE_URL";
pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tmdb_api_key = lookup(API_KEY_VAR)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let tmdb_base_url = lookup(BASE_URL_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| TMDB_BASE.to_string());

        let listen_raw = lookup(LISTEN_ADDR_VAR).unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidVar {
                name: LISTEN_ADDR_VAR,
                value: listen_raw.clone(),
            })?;

        Ok(Self {
            tmdb_api_key,
            tmdb_base_url,
            listen_addr,
        })
    }
}
