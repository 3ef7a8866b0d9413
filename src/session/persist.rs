use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AppVariant;
use super::state::{SessionObserver, SessionState};
use crate::models::{BusinessContext, User};
use crate::storage::CredentialStore;

/// 持久化的会话子集，不包含任何令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub business_context: Option<BusinessContext>,
}

/// 把会话子集写入应用级存储键
pub struct SessionPersister {
    store: CredentialStore,
    variant: AppVariant,
}

impl SessionPersister {
    pub fn new(store: CredentialStore, variant: AppVariant) -> Self {
        Self { store, variant }
    }

    pub fn key(&self) -> &'static str {
        self.variant.session_key()
    }

    pub fn snapshot(&self, state: &SessionState) -> PersistedSession {
        PersistedSession {
            user: state.user.clone(),
            is_authenticated: state.is_authenticated,
            business_context: if self.variant.uses_business_context() {
                state.business_context.clone()
            } else {
                None
            },
        }
    }

    /// 序列化为 `{user, isAuthenticated[, businessContext]}`
    pub fn encode(&self, snapshot: &PersistedSession) -> Result<String, serde_json::Error> {
        let mut value = serde_json::to_value(snapshot)?;
        if !self.variant.uses_business_context() {
            if let Some(object) = value.as_object_mut() {
                object.remove("businessContext");
            }
        }
        serde_json::to_string(&value)
    }

    pub fn save(&self, state: &SessionState) -> bool {
        match self.encode(&self.snapshot(state)) {
            Ok(json) => self.store.set(self.key(), &json),
            Err(e) => {
                warn!("Failed to serialize session: {}", e);
                false
            }
        }
    }

    /// 读取失败或内容无法解析时返回 `None`
    pub fn load(&self) -> Option<PersistedSession> {
        let json = self.store.get(self.key())?;
        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring unreadable persisted session under {}: {}", self.key(), e);
                None
            }
        }
    }

    pub fn clear(&self) -> bool {
        self.store.remove(self.key())
    }
}

impl SessionObserver for SessionPersister {
    fn on_change(&mut self, state: &SessionState) {
        self.save(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::TokenPair;
    use crate::auth::token::TokenManager;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn shared_store() -> (Arc<MemoryStorage>, CredentialStore) {
        let backend = Arc::new(MemoryStorage::new());
        (backend.clone(), CredentialStore::new(backend))
    }

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "owner@example.com".into(),
            name: "Owner".into(),
            roles: vec!["owner".into()],
        }
    }

    fn context() -> BusinessContext {
        BusinessContext {
            business_id: "b1".into(),
            business_name: "Harbour Bistro".into(),
            location_id: None,
            location_name: None,
        }
    }

    #[test]
    fn business_snapshot_round_trips() {
        let (_, store) = shared_store();
        let persister = SessionPersister::new(store, AppVariant::Business);
        let state = SessionState {
            user: Some(user()),
            business_context: Some(context()),
            is_authenticated: true,
            is_loading: true,
        };

        assert!(persister.save(&state));
        let loaded = persister.load().expect("session should be persisted");
        assert_eq!(loaded.user, state.user);
        assert_eq!(loaded.business_context, state.business_context);
        assert!(loaded.is_authenticated);
    }

    #[test]
    fn guest_payload_has_no_business_context() {
        let (_, store) = shared_store();
        let persister = SessionPersister::new(store.clone(), AppVariant::Guest);
        let state = SessionState {
            user: Some(user()),
            business_context: Some(context()),
            is_authenticated: true,
            is_loading: false,
        };
        persister.save(&state);

        let raw = store.get("auth-storage").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["isAuthenticated"], true);
        assert_eq!(value["user"]["id"], "u1");
        assert!(value.get("businessContext").is_none());
        assert!(value.get("isLoading").is_none());
    }

    #[test]
    fn business_payload_keeps_null_context() {
        let (_, store) = shared_store();
        let persister = SessionPersister::new(store.clone(), AppVariant::Business);
        persister.save(&SessionState::default());

        let raw = store.get("business-auth-storage").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["businessContext"].is_null());
        assert!(value["user"].is_null());
    }

    #[test]
    fn tokens_never_reach_the_session_payload() {
        let (_, store) = shared_store();
        let tokens = TokenManager::new(store.clone());
        let persister = SessionPersister::new(store.clone(), AppVariant::Business);
        let mut session = SessionStore::restore(AppVariant::Business, tokens, persister);

        session.set_tokens(&TokenPair {
            access_token: "secret-access".into(),
            refresh_token: "secret-refresh".into(),
            expires_in: Some(3600),
        });
        session.set_user(Some(user()));
        session.set_business_context(Some(context()));

        let raw = store.get("business-auth-storage").unwrap();
        assert!(!raw.contains("secret-access"));
        assert!(!raw.contains("secret-refresh"));
        assert!(!raw.to_lowercase().contains("token"));
    }

    #[test]
    fn restore_rehydrates_before_first_use() {
        let (_, store) = shared_store();
        {
            let tokens = TokenManager::new(store.clone());
            let persister = SessionPersister::new(store.clone(), AppVariant::Business);
            let mut session = SessionStore::restore(AppVariant::Business, tokens, persister);
            session.set_user(Some(user()));
            session.set_business_context(Some(context()));
        }

        let tokens = TokenManager::new(store.clone());
        let persister = SessionPersister::new(store.clone(), AppVariant::Business);
        let session = SessionStore::restore(AppVariant::Business, tokens, persister);
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&user()));
        assert_eq!(session.business_context(), Some(&context()));
    }

    #[test]
    fn logout_is_persisted() {
        let (_, store) = shared_store();
        let persister = SessionPersister::new(store.clone(), AppVariant::Guest);
        let mut session =
            SessionStore::restore(AppVariant::Guest, TokenManager::new(store.clone()), persister);
        session.set_user(Some(user()));
        session.logout();

        let loaded = SessionPersister::new(store, AppVariant::Guest).load().unwrap();
        assert_eq!(loaded.user, None);
        assert!(!loaded.is_authenticated);
    }

    #[test]
    fn unreadable_payload_is_ignored() {
        let (_, store) = shared_store();
        store.set("auth-storage", "{not json");
        let persister = SessionPersister::new(store.clone(), AppVariant::Guest);
        assert_eq!(persister.load(), None);

        let session =
            SessionStore::restore(AppVariant::Guest, TokenManager::new(store), persister);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn unavailable_storage_starts_empty() {
        let (backend, store) = shared_store();
        backend.set_available(false);
        let persister = SessionPersister::new(store.clone(), AppVariant::Guest);
        let mut session =
            SessionStore::restore(AppVariant::Guest, TokenManager::new(store), persister);
        session.set_user(Some(user()));
        assert!(session.is_authenticated());
    }
}
