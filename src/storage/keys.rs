/// 访问令牌键
pub const ACCESS_TOKEN_KEY: &str = "auth_access_token";

/// 刷新令牌键
pub const REFRESH_TOKEN_KEY: &str = "auth_refresh_token";

/// 令牌过期时间键，值为毫秒级时间戳的十进制字符串
pub const TOKEN_EXPIRY_KEY: &str = "auth_token_expiry";

/// 可用性探测使用的哨兵键
pub const PROBE_KEY: &str = "__storage_test__";

/// 后台与访客端共用的会话键
pub const SESSION_KEY: &str = "auth-storage";

/// 商户端会话键
pub const BUSINESS_SESSION_KEY: &str = "business-auth-storage";

/// 令牌相关的全部键，按写入顺序排列
pub const TOKEN_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY];

/// 生成带命名空间前缀的键
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    format!("{}:{}", namespace, key)
}

/// 生成命名空间下所有键的匹配模式
pub fn namespace_pattern(namespace: &str) -> String {
    format!("{}:*", namespace)
}
