use serde::{Deserialize, Serialize};

/// 服务端错误响应
///
/// 不同服务返回的字段不一致，按 `message`、`error`、`msg` 的顺序取第一个。
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .or(self.msg)
            .filter(|m| !m.trim().is_empty())
    }
}

/// 从响应体中提取可展示的错误消息
pub fn error_message(body: &str, fallback: &str) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        return message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 列表查询参数
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub venue_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery {
    pub fn for_venue(venue_id: impl Into<String>) -> Self {
        Self {
            venue_id: Some(venue_id.into()),
            ..Self::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(venue_id) = &self.venue_id {
            pairs.push(("venueId", venue_id.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        assert_eq!(
            error_message(r#"{"message":"Venue not found","error":"not_found"}"#, "Not Found"),
            "Venue not found"
        );
        assert_eq!(error_message(r#"{"code":1002,"msg":"密码无效"}"#, "x"), "密码无效");
    }

    #[test]
    fn falls_back_to_text_then_reason() {
        assert_eq!(error_message("upstream timeout\n", "Bad Gateway"), "upstream timeout");
        assert_eq!(error_message("", "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"message":""}"#, "Bad Gateway"), r#"{"message":""}"#);
    }
}
