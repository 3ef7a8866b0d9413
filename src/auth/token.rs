use std::sync::Arc;

use tracing::{debug, warn};

use super::claims::peek_claims;
use super::models::{CredentialRecord, TokenPair};
use crate::clock::{Clock, SystemClock};
use crate::storage::CredentialStore;
use crate::storage::keys::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY, TOKEN_KEYS};

/// 响应和令牌都没有给出有效期时使用的默认值
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// HTTP 客户端读取和维护凭据的接口
pub trait CredentialAdapter: Send + Sync {
    fn get_access_token(&self) -> Option<String>;
    fn get_refresh_token(&self) -> Option<String>;
    fn set_tokens(&self, tokens: &TokenPair) -> bool;
    fn clear_tokens(&self);
}

/// 令牌生命周期管理
///
/// 访问令牌、刷新令牌和过期时间作为一个整体写入和清除。
#[derive(Clone)]
pub struct TokenManager {
    store: CredentialStore,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(store: CredentialStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: CredentialStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// 保存令牌，过期时间为当前时间加上 `expires_in_secs`
    ///
    /// 任意一次写入失败都会尽量删除三个键并返回 `false`，
    /// 留下的状态总是被视为已过期。
    pub fn set_tokens(&self, access: &str, refresh: &str, expires_in_secs: u64) -> bool {
        let expires_in_millis = i64::try_from(expires_in_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        let expires_at = self.clock.now_millis().saturating_add(expires_in_millis);
        let expiry = expires_at.to_string();

        let values = [access, refresh, expiry.as_str()];
        for (key, value) in TOKEN_KEYS.iter().zip(values) {
            if !self.store.set(key, value) {
                warn!("Partial token write at {}, discarding stored tokens", key);
                self.clear_tokens();
                return false;
            }
        }

        debug!("Stored tokens expiring at {}", expires_at);
        true
    }

    /// 保存身份服务返回的令牌
    ///
    /// 缺少 `expiresIn` 时从访问令牌的 `exp` 推算。
    pub fn set_token_pair(&self, tokens: &TokenPair) -> bool {
        let expires_in = tokens
            .expires_in
            .or_else(|| self.expires_in_from_claims(&tokens.access_token))
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        self.set_tokens(&tokens.access_token, &tokens.refresh_token, expires_in)
    }

    fn expires_in_from_claims(&self, access_token: &str) -> Option<u64> {
        let claims = peek_claims(access_token)?;
        let remaining_millis = claims
            .exp
            .saturating_mul(1000)
            .saturating_sub(self.clock.now_millis());
        Some(u64::try_from(remaining_millis / 1000).unwrap_or(0))
    }

    pub fn get_access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn get_refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// 读取过期时间，不存在或无法解析时返回 `None`
    pub fn expires_at(&self) -> Option<i64> {
        self.store
            .get(TOKEN_EXPIRY_KEY)
            .and_then(|value| value.trim().parse::<i64>().ok())
    }

    /// 缺失或无法解析的过期时间一律视为已过期
    pub fn is_token_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires_at) => self.clock.now_millis() >= expires_at,
            None => true,
        }
    }

    /// 三个键都存在时返回完整凭据
    pub fn record(&self) -> Option<CredentialRecord> {
        Some(CredentialRecord {
            access_token: self.get_access_token()?,
            refresh_token: self.get_refresh_token()?,
            expires_at_epoch_millis: self.expires_at()?,
        })
    }

    /// 删除三个键，不报告部分失败
    pub fn clear_tokens(&self) {
        for key in TOKEN_KEYS {
            self.store.remove(key);
        }
    }
}

impl CredentialAdapter for TokenManager {
    fn get_access_token(&self) -> Option<String> {
        TokenManager::get_access_token(self)
    }

    fn get_refresh_token(&self) -> Option<String> {
        TokenManager::get_refresh_token(self)
    }

    fn set_tokens(&self, tokens: &TokenPair) -> bool {
        self.set_token_pair(tokens)
    }

    fn clear_tokens(&self) {
        TokenManager::clear_tokens(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn manager() -> (Arc<MemoryStorage>, Arc<ManualClock>, TokenManager) {
        let backend = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let manager = TokenManager::with_clock(CredentialStore::new(backend.clone()), clock.clone());
        (backend, clock, manager)
    }

    #[test]
    fn expired_when_nothing_was_ever_set() {
        let (_, _, manager) = manager();
        assert!(manager.is_token_expired());
        assert_eq!(manager.record(), None);
    }

    #[test]
    fn expiry_follows_the_clock() {
        let (_, clock, manager) = manager();
        assert!(manager.set_tokens("a1", "r1", 3600));
        assert!(!manager.is_token_expired());

        clock.advance(Duration::seconds(3599));
        assert!(!manager.is_token_expired());

        clock.advance(Duration::seconds(2));
        assert!(manager.is_token_expired());
    }

    #[test]
    fn expiry_is_stored_as_epoch_millis() {
        let (backend, _, manager) = manager();
        manager.set_tokens("a1", "r1", 60);
        let stored = crate::storage::KeyValueStorage::get_item(backend.as_ref(), TOKEN_EXPIRY_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some("1700000060000"));
        assert_eq!(
            manager.record(),
            Some(CredentialRecord {
                access_token: "a1".into(),
                refresh_token: "r1".into(),
                expires_at_epoch_millis: 1_700_000_060_000,
            })
        );
    }

    #[test]
    fn zero_lifetime_is_already_expired() {
        let (_, _, manager) = manager();
        manager.set_tokens("a1", "r1", 0);
        assert!(manager.is_token_expired());
    }

    #[test]
    fn unparsable_expiry_counts_as_expired() {
        let (_, _, manager) = manager();
        manager.set_tokens("a1", "r1", 3600);
        manager.store().set(TOKEN_EXPIRY_KEY, "tomorrow");
        assert!(manager.is_token_expired());
    }

    #[test]
    fn clear_removes_both_tokens() {
        let (backend, _, manager) = manager();
        manager.set_tokens("a1", "r1", 3600);
        manager.clear_tokens();
        assert_eq!(manager.get_access_token(), None);
        assert_eq!(manager.get_refresh_token(), None);
        assert!(manager.is_token_expired());
        assert!(backend.is_empty());
    }

    #[test]
    fn partial_write_leaves_no_tokens() {
        let backend = Arc::new(MemoryStorage::with_quota(2));
        let manager = TokenManager::new(CredentialStore::new(backend.clone()));
        assert!(!manager.set_tokens("a1", "r1", 3600));
        assert_eq!(manager.get_access_token(), None);
        assert!(manager.is_token_expired());
        assert!(backend.is_empty());
    }

    #[test]
    fn unavailable_storage_reads_as_expired() {
        let (backend, _, manager) = manager();
        manager.set_tokens("a1", "r1", 3600);
        backend.set_available(false);
        assert!(manager.is_token_expired());
        assert_eq!(manager.get_access_token(), None);
        manager.clear_tokens();
    }

    #[test]
    fn token_pair_without_lifetime_uses_jwt_exp() {
        let (_, clock, manager) = manager();
        let exp = clock.now_millis() / 1000 + 600;
        let access = encode(
            &Header::default(),
            &serde_json::json!({ "sub": "u1", "exp": exp }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(manager.set_token_pair(&TokenPair {
            access_token: access,
            refresh_token: "r1".into(),
            expires_in: None,
        }));
        assert_eq!(manager.expires_at(), Some(exp * 1000));
    }

    #[test]
    fn extreme_jwt_exp_is_treated_as_expired() {
        let (_, _, manager) = manager();
        for exp in [i64::MIN / 10, i64::MIN, i64::MAX] {
            let access = encode(
                &Header::default(),
                &serde_json::json!({ "sub": "u1", "exp": exp }),
                &EncodingKey::from_secret(b"secret"),
            )
            .unwrap();
            assert!(manager.set_token_pair(&TokenPair {
                access_token: access,
                refresh_token: "r1".into(),
                expires_in: None,
            }));
            assert_eq!(manager.is_token_expired(), exp < 0, "exp = {}", exp);
        }
    }

    #[test]
    fn opaque_token_pair_falls_back_to_default_lifetime() {
        let (_, clock, manager) = manager();
        let adapter: &dyn CredentialAdapter = &manager;
        adapter.set_tokens(&TokenPair {
            access_token: "a1".into(),
            refresh_token: "r1".into(),
            expires_in: None,
        });
        assert_eq!(
            manager.expires_at(),
            Some(clock.now_millis() + DEFAULT_EXPIRES_IN_SECS as i64 * 1000)
        );
        assert_eq!(adapter.get_refresh_token().as_deref(), Some("r1"));
    }
}
