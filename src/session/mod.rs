//! 会话状态容器
//!
//! `SessionStore` 保存当前用户、商户上下文和登录标志，每次修改只产生一次通知。
//! 持久化通过注册 `SessionPersister` 观察者完成，令牌不在持久化内容之中。

pub mod persist;
pub mod state;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::storage::keys::{BUSINESS_SESSION_KEY, SESSION_KEY};

pub use persist::{PersistedSession, SessionPersister};
pub use state::{SessionObserver, SessionState, SessionStore};

/// 前端应用类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppVariant {
    Admin,
    Business,
    Guest,
}

impl AppVariant {
    /// 会话持久化使用的存储键
    pub fn session_key(self) -> &'static str {
        match self {
            AppVariant::Business => BUSINESS_SESSION_KEY,
            AppVariant::Admin | AppVariant::Guest => SESSION_KEY,
        }
    }

    pub fn uses_business_context(self) -> bool {
        matches!(self, AppVariant::Business)
    }
}

impl FromStr for AppVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(AppVariant::Admin),
            "business" => Ok(AppVariant::Business),
            "guest" => Ok(AppVariant::Guest),
            other => Err(ConfigError::Invalid {
                key: "APP_VARIANT",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AppVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppVariant::Admin => "admin",
            AppVariant::Business => "business",
            AppVariant::Guest => "guest",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_their_storage_keys() {
        assert_eq!(AppVariant::Admin.session_key(), "auth-storage");
        assert_eq!(AppVariant::Guest.session_key(), "auth-storage");
        assert_eq!(AppVariant::Business.session_key(), "business-auth-storage");
    }

    #[test]
    fn variant_parses_from_config_value() {
        assert_eq!("Business".parse::<AppVariant>().unwrap(), AppVariant::Business);
        assert!("kiosk".parse::<AppVariant>().is_err());
    }
}
