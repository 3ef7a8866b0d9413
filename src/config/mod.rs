use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::session::AppVariant;

/// 本地存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            "redis" => Ok(StorageBackend::Redis),
            other => Err(ConfigError::Invalid {
                key: "STORAGE_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub app_variant: AppVariant,
    pub storage_backend: StorageBackend,
    pub storage_path: PathBuf,
    pub redis_url: Option<String>,
    pub storage_namespace: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").map_err(|_| ConfigError::Missing("API_BASE_URL"))?;

        let app_variant = match env::var("APP_VARIANT") {
            Ok(v) => v.parse()?,
            Err(_) => AppVariant::Guest,
        };
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => StorageBackend::File,
        };
        let redis_url = env::var("REDIS_URL").ok();
        if storage_backend == StorageBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::Missing("REDIS_URL"));
        }

        Ok(Config {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            app_variant,
            storage_backend,
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".hospitality/storage.json")),
            redis_url,
            storage_namespace: env::var("STORAGE_NAMESPACE").unwrap_or_else(|_| "hospitality".into()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
