//! 本地持久化存储
//!
//! 后端实现 `KeyValueStorage` 并返回错误，`CredentialStore` 在其上提供
//! 不抛错的包装：写入失败返回 `false`，读取失败返回 `None`。

pub mod file;
pub mod keys;
pub mod memory;
pub mod redis_backend;

use std::sync::Arc;

use tracing::warn;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use redis_backend::RedisStorage;

/// 键值存储后端
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// 精确区分“不存在”和“不可用”的读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLookup {
    Present(String),
    Absent,
    Unavailable,
}

impl StorageLookup {
    pub fn into_option(self) -> Option<String> {
        match self {
            StorageLookup::Present(value) => Some(value),
            StorageLookup::Absent | StorageLookup::Unavailable => None,
        }
    }
}

/// 不抛错的存储包装
///
/// `get` 对缺失的键和不可用的存储都返回 `None`，调用方无法区分两者；
/// 需要区分时使用 `lookup`。
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn KeyValueStorage>) -> Self {
        Self { backend }
    }

    /// 写入再删除哨兵键，每次调用都重新探测
    pub fn probe_availability(&self) -> bool {
        let result = self
            .backend
            .set_item(keys::PROBE_KEY, keys::PROBE_KEY)
            .and_then(|_| self.backend.remove_item(keys::PROBE_KEY));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Storage probe failed: {}", e);
                false
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) -> bool {
        match self.backend.set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write storage key {}: {}", key, e);
                false
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).into_option()
    }

    pub fn lookup(&self, key: &str) -> StorageLookup {
        match self.backend.get_item(key) {
            Ok(Some(value)) => StorageLookup::Present(value),
            Ok(None) => StorageLookup::Absent,
            Err(e) => {
                warn!("Failed to read storage key {}: {}", key, e);
                StorageLookup::Unavailable
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove storage key {}: {}", key, e);
                false
            }
        }
    }

    pub fn clear(&self) -> bool {
        match self.backend.clear() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to clear storage: {}", e);
                false
            }
        }
    }
}
