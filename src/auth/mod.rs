//! 认证：令牌生命周期、登录注册流程和令牌声明读取

pub mod claims;
pub mod flow;
pub mod models;
pub mod token;

pub use claims::{AccessClaims, peek_claims};
pub use models::{AuthResponse, CredentialRecord, LoginRequest, RegisterRequest, TokenPair};
pub use token::{CredentialAdapter, DEFAULT_EXPIRES_IN_SECS, TokenManager};
