use tracing::{info, warn};

use super::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::api::{ApiClient, ApiError};
use crate::error::AppError;
use crate::models::User;
use crate::session::SessionStore;
use crate::utils::{validate_login, validate_registration};

/// 登录
///
/// 校验通过后才发起请求；成功时先保存令牌再设置用户。
pub async fn login(
    api: &ApiClient,
    session: &mut SessionStore,
    req: &LoginRequest,
) -> Result<User, AppError> {
    validate_login(req)?;

    session.set_loading(true);
    let result = api.auth().login(req).await;
    session.set_loading(false);

    match result {
        Ok(resp) => Ok(establish(session, resp)),
        Err(ApiError::Unauthorized) => {
            // 客户端已清除令牌，原有会话随之失效
            session.logout();
            Err(AppError::InvalidCredentials)
        }
        Err(e) => Err(e.into()),
    }
}

/// 注册，成功后与登录一样建立会话
pub async fn register(
    api: &ApiClient,
    session: &mut SessionStore,
    req: &RegisterRequest,
) -> Result<User, AppError> {
    validate_registration(req)?;

    session.set_loading(true);
    let result = api.auth().register(req).await;
    session.set_loading(false);

    let resp = guard(session, result)?;
    Ok(establish(session, resp))
}

/// 通知服务端后清除本地会话，远端失败不影响本地登出
pub async fn logout(api: &ApiClient, session: &mut SessionStore) {
    if session.tokens().get_access_token().is_some() {
        if let Err(e) = api.auth().logout().await {
            warn!("Remote logout failed: {}", e);
        }
    }
    session.logout();
}

/// 刷新当前用户信息，令牌失效时登出
pub async fn refresh_user(api: &ApiClient, session: &mut SessionStore) -> Result<User, AppError> {
    if session.check_expiry() {
        return Err(AppError::ExpiredSession);
    }
    let user = guard(session, api.auth().me().await)?;
    session.set_user(Some(user.clone()));
    Ok(user)
}

/// 包装业务接口的结果：收到 401 时登出本地会话
pub fn guard<T>(session: &mut SessionStore, result: Result<T, ApiError>) -> Result<T, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(ApiError::Unauthorized) => {
            session.logout();
            Err(AppError::ExpiredSession)
        }
        Err(e) => Err(e.into()),
    }
}

fn establish(session: &mut SessionStore, resp: AuthResponse) -> User {
    if !session.set_tokens(&resp.tokens) {
        warn!("Tokens could not be stored, session will not survive a restart");
    }
    session.set_user(Some(resp.user.clone()));
    if session.variant().uses_business_context() {
        session.set_business_context(resp.business_context);
    }
    info!("Signed in as {}", resp.user.email);
    resp.user
}
