use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::error::BootstrapError;

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
pub mod utils;

use crate::api::ApiClient;
use crate::auth::TokenManager;
use crate::session::{SessionPersister, SessionStore};
use crate::storage::{CredentialStore, FileStorage, KeyValueStorage, MemoryStorage, RedisStorage};

/// 应用运行时依赖
pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub api: ApiClient,
}

impl AppContext {
    /// 按配置创建存储、恢复会话并构建 API 客户端
    pub fn bootstrap(config: Config) -> Result<Self, BootstrapError> {
        let backend = open_storage(&config)?;
        let store = CredentialStore::new(backend);
        if !store.probe_availability() {
            tracing::warn!("Local storage unavailable, session will not be persisted");
        }

        let tokens = TokenManager::new(store.clone());
        let api = ApiClient::new(
            &config.api_base_url,
            Arc::new(tokens.clone()),
            config.request_timeout(),
        )?;
        let persister = SessionPersister::new(store, config.app_variant);
        let session = SessionStore::restore(config.app_variant, tokens, persister);

        Ok(AppContext {
            config,
            session,
            api,
        })
    }
}

pub fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStorage>, BootstrapError> {
    let backend: Arc<dyn KeyValueStorage> = match config.storage_backend {
        StorageBackend::File => Arc::new(FileStorage::new(&config.storage_path)),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(crate::error::ConfigError::Missing("REDIS_URL"))?;
            Arc::new(RedisStorage::open(url, &config.storage_namespace)?)
        }
    };
    tracing::debug!("Using {:?} storage backend", config.storage_backend);
    Ok(backend)
}
