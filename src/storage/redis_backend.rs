use redis::{Client as RedisClient, Commands};

use super::KeyValueStorage;
use super::keys::{namespace_pattern, namespaced_key};
use crate::error::StorageError;

/// Redis 存储，所有键都带命名空间前缀
pub struct RedisStorage {
    client: RedisClient,
    namespace: String,
}

impl RedisStorage {
    pub fn open(redis_url: &str, namespace: &str) -> Result<Self, StorageError> {
        let client = RedisClient::open(redis_url)?;
        Ok(Self {
            client,
            namespace: namespace.to_string(),
        })
    }

    fn connection(&self) -> Result<redis::Connection, StorageError> {
        self.client
            .get_connection()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl KeyValueStorage for RedisStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connection()?;
        let value: Option<String> = conn.get(namespaced_key(&self.namespace, key))?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let _: () = conn.set(namespaced_key(&self.namespace, key), value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection()?;
        let _: () = conn.del(namespaced_key(&self.namespace, key))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut conn = self.connection()?;

        // 只删除本命名空间下的键
        let keys: Vec<String> = conn.keys(namespace_pattern(&self.namespace))?;
        if !keys.is_empty() {
            let _: () = conn.del(keys)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_server_is_unavailable() {
        let storage = RedisStorage::open("redis://127.0.0.1:1/", "test").unwrap();
        assert!(matches!(storage.get_item("k"), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(RedisStorage::open("not a url", "test").is_err());
    }
}
