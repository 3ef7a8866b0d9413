use serde::{Deserialize, Serialize};

use crate::models::{BusinessContext, User};

/// 本地保存的凭据
///
/// 对应三个独立的存储键，任何一个缺失都视为没有有效会话。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at_epoch_millis: i64,
}

/// 身份服务返回的令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 有效期，单位秒
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// 登录与注册的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub tokens: TokenPair,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_context: Option<BusinessContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// 只在客户端校验，不发送
    #[serde(skip)]
    pub confirm_password: String,
    pub name: String,
}
