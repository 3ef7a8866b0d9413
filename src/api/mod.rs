//! 远端服务客户端
//!
//! `ApiClient` 负责附加访问令牌、处理 401 和错误响应，
//! 各业务接口只是在它之上的薄封装。

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod common;
pub mod inventory;
pub mod orders;
pub mod venues;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::token::CredentialAdapter;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use bookings::BookingApi;
pub use common::ListQuery;
pub use inventory::InventoryApi;
pub use orders::OrderApi;
pub use venues::VenueApi;

/// 每个请求携带的追踪头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    Unauthorized,
    #[error("request failed with status {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
}

/// 收到 401 时调用，通常用来登出
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialAdapter>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        credentials: Arc<dyn CredentialAdapter>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            on_unauthorized: None,
        })
    }

    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialAdapter> {
        &self.credentials
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn venues(&self) -> VenueApi<'_> {
        VenueApi::new(self)
    }

    pub fn bookings(&self) -> BookingApi<'_> {
        BookingApi::new(self)
    }

    pub fn orders(&self) -> OrderApi<'_> {
        OrderApi::new(self)
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    /// 拼接路径，每一段单独做百分号编码
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let mut builder = self
            .http
            .request(method, self.endpoint(segments)?)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.credentials.get_access_token() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    pub(crate) async fn get<T>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, segments)?.query(query);
        self.send_json(builder).await
    }

    pub(crate) async fn post<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, segments)?.json(body);
        self.send_json(builder).await
    }

    pub(crate) async fn put<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, segments)?.json(body);
        self.send_json(builder).await
    }

    pub(crate) async fn patch<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PATCH, segments)?.json(body);
        self.send_json(builder).await
    }

    /// 发送请求并丢弃响应体
    pub(crate) async fn post_empty(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, segments)?).await?;
        Ok(())
    }

    async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let body = self.execute(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} returned 401, clearing credentials", url);
            self.credentials.clear_tokens();
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = common::error_message(&body, status.canonical_reason().unwrap_or("Request failed"));
            warn!("{} failed with status {}: {}", url, status.as_u16(), message);
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        debug!("{} -> {}", url, status.as_u16());
        Ok(body)
    }
}
