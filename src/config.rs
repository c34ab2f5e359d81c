// src/config.rs
//
// Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::db::default_database_path;
use crate::error::{AppError, AppResult};
use crate::repositories::ConflictPolicy;

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_WEB_ROOT: &str = "web";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Holds `Views/` and `Themes/`
    pub web_root: PathBuf,
    /// `false` installs the plain view resolver
    pub themes_enabled: bool,
    pub conflict_policy: ConflictPolicy,
    pub pool_size: u32,
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = match get("QUILL_DATABASE") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let bind_raw = get("QUILL_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|e| AppError::Config(format!("QUILL_BIND `{}`: {}", bind_raw, e)))?;

        let web_root = PathBuf::from(get("QUILL_WEB_ROOT").unwrap_or_else(|| DEFAULT_WEB_ROOT.to_string()));

        let themes_enabled = match get("QUILL_THEMES") {
            Some(value) => parse_switch(&value)
                .ok_or_else(|| AppError::Config(format!("QUILL_THEMES `{}`: expected on/off", value)))?,
            None => true,
        };

        let conflict_policy = match get("QUILL_CONFLICT_POLICY") {
            Some(value) => value
                .parse()
                .map_err(|e| AppError::Config(format!("QUILL_CONFLICT_POLICY: {}", e)))?,
            None => ConflictPolicy::default(),
        };

        let pool_size = match get("QUILL_POOL_SIZE") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(AppError::Config(format!(
                        "QUILL_POOL_SIZE `{}`: expected a positive integer",
                        value
                    )))
                }
            },
            None => DEFAULT_POOL_SIZE,
        };

        let log_level = get("QUILL_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            database_path,
            bind_addr,
            web_root,
            themes_enabled,
            conflict_policy,
            pool_size,
            log_level,
        })
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
