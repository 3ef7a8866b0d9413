use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::error::AppError;

/// 密码最小长度
pub const MIN_PASSWORD_LEN: usize = 8;

/// 粗略检查邮箱格式，最终以服务端为准
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation("Please enter a valid email address".into()))
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn validate_login(req: &LoginRequest) -> Result<(), AppError> {
    validate_email(&req.email)?;
    if req.password.is_empty() {
        return Err(AppError::Validation("Please enter your password".into()));
    }
    Ok(())
}

pub fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Please enter your name".into()));
    }
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if req.password != req.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    Ok(())
}
