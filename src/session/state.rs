use tracing::{debug, info};

use super::AppVariant;
use super::persist::{PersistedSession, SessionPersister};
use crate::auth::models::TokenPair;
use crate::auth::token::TokenManager;
use crate::models::{BusinessContext, User};

/// 会话状态
///
/// 始终满足 `is_authenticated == user.is_some()`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub business_context: Option<BusinessContext>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

/// 状态变化的观察者
pub trait SessionObserver: Send {
    fn on_change(&mut self, state: &SessionState);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionState) + Send,
{
    fn on_change(&mut self, state: &SessionState) {
        self(state)
    }
}

/// 会话状态容器
///
/// 显式构造、按需注入，测试中可以创建互不相干的实例。
pub struct SessionStore {
    variant: AppVariant,
    state: SessionState,
    tokens: TokenManager,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl SessionStore {
    pub fn new(variant: AppVariant, tokens: TokenManager) -> Self {
        Self {
            variant,
            state: SessionState::default(),
            tokens,
            observers: Vec::new(),
        }
    }

    /// 从持久化内容恢复状态，然后把持久化器注册为观察者
    pub fn restore(variant: AppVariant, tokens: TokenManager, persister: SessionPersister) -> Self {
        let mut store = Self::new(variant, tokens);
        if let Some(snapshot) = persister.load() {
            store.hydrate(snapshot);
        }
        store.subscribe(persister);
        store
    }

    /// 用持久化内容预填状态，不通知观察者
    pub fn hydrate(&mut self, snapshot: PersistedSession) {
        let business_context = if self.variant.uses_business_context() {
            snapshot.business_context
        } else {
            None
        };
        let is_authenticated = snapshot.user.is_some();
        if is_authenticated != snapshot.is_authenticated {
            debug!("Persisted isAuthenticated disagrees with user, recomputing");
        }

        self.state = SessionState {
            user: snapshot.user,
            business_context,
            is_authenticated,
            is_loading: false,
        };
        info!(
            "Restored {} session, authenticated: {}",
            self.variant, self.state.is_authenticated
        );
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: SessionObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn variant(&self) -> AppVariant {
        self.variant
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn business_context(&self) -> Option<&BusinessContext> {
        self.state.business_context.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn set_user(&mut self, user: Option<User>) {
        let next = SessionState {
            is_authenticated: user.is_some(),
            user,
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// 与用户无关，调用方自行保证两者一致
    pub fn set_business_context(&mut self, business_context: Option<BusinessContext>) {
        if business_context.is_some() && !self.variant.uses_business_context() {
            debug!("Business context set on {} session, it will not be persisted", self.variant);
        }
        let next = SessionState {
            business_context,
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// 只保存令牌，不修改用户和登录标志
    pub fn set_tokens(&mut self, tokens: &TokenPair) -> bool {
        self.tokens.set_token_pair(tokens)
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        let next = SessionState {
            is_loading,
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// 清除令牌并一次性回到未登录状态，可重复调用
    pub fn logout(&mut self) {
        self.tokens.clear_tokens();
        let next = SessionState {
            is_loading: self.state.is_loading,
            ..SessionState::default()
        };
        self.commit(next);
        info!("Logged out of {} session", self.variant);
    }

    /// 已登录但令牌过期时登出，返回是否发生了登出
    pub fn check_expiry(&mut self) -> bool {
        if self.state.is_authenticated && self.tokens.is_token_expired() {
            info!("Access token expired, forcing re-authentication");
            self.logout();
            return true;
        }
        false
    }

    fn commit(&mut self, next: SessionState) {
        self.state = next;
        for observer in self.observers.iter_mut() {
            observer.on_change(&self.state);
        }
    }
}
