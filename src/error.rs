use thiserror::Error;

use crate::api::ApiError;

/// 存储层错误
///
/// 只在后端实现中出现，`CredentialStore` 会把它们吞掉并记录日志。
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage payload is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 启动阶段的错误
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// 面向界面的错误，`Display` 即为可展示的提示
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Your session has expired, please sign in again")]
    ExpiredSession,
    #[error("{0}")]
    Remote(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AppError::ExpiredSession,
            ApiError::Remote { message, .. } => AppError::Remote(message),
            ApiError::Transport(e) => AppError::Network(e.to_string()),
            ApiError::Decode(e) => AppError::Remote(format!("Unexpected response: {}", e)),
            ApiError::InvalidUrl(url) => AppError::Network(format!("Invalid service address {}", url)),
        }
    }
}
