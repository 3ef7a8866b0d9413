use super::{ApiClient, ApiError};
use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::User;

/// 身份服务接口
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client.post(&["auth", "login"], req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client.post(&["auth", "register"], req).await
    }

    /// 获取当前登录用户
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get(&["auth", "me"], &[]).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.post_empty(&["auth", "logout"]).await
    }
}
