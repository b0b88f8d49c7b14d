// ==========================================
// BoM 转 EPD - 评分服务客户端
// ==========================================
// 职责: 将载荷 POST 到 run-epd-tree 接口
// 请求头: x-api-key / content-type: application/json
// 规则: 单次同步调用，不重试；响应仅记录日志，不回流到管道
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::Payload;
use serde_json::Value;
use std::fmt;
use tracing::{info, instrument, warn};
use ureq::Agent;

// ==========================================
// SubmissionResponse
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// JSON 优先，解析失败保留原文
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => write!(f, "{pretty}"),
                Err(_) => write!(f, "{value}"),
            },
            ResponseBody::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl SubmissionResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ==========================================
// EpdSubmitter Trait
// ==========================================

/// 载荷提交接口（测试中以内存实现替换）
pub trait EpdSubmitter: Send + Sync {
    /// # 返回
    /// - Ok: 2xx 响应
    /// - Err(Transport): 网络错误
    /// - Err(UnexpectedStatus): 非 2xx 响应
    fn submit(&self, payload: &Payload) -> ApiResult<SubmissionResponse>;
}

// ==========================================
// HttpEpdClient - ureq 实现
// ==========================================
pub struct HttpEpdClient {
    url: String,
    api_key: String,
    agent: Agent,
}

impl HttpEpdClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        // 非 2xx 也读取响应体，以便记录服务端错误信息
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            url: url.into(),
            api_key: api_key.into(),
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EpdSubmitter for HttpEpdClient {
    #[instrument(skip(self, payload), fields(url = %self.url))]
    fn submit(&self, payload: &Payload) -> ApiResult<SubmissionResponse> {
        let body = serde_json::to_string(payload)?;

        let response = self
            .agent
            .post(self.url.as_str())
            .header("x-api-key", self.api_key.as_str())
            .header("content-type", "application/json")
            .send(body.as_str())
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let raw = response
            .into_body()
            .read_to_string()
            .map_err(|err| ApiError::ResponseRead(err.to_string()))?;
        let body = ResponseBody::parse(raw);

        match &body {
            ResponseBody::Json(value) => info!(status, response = %value, "评分服务响应"),
            ResponseBody::Text(text) => {
                warn!(status, response = %text, "评分服务响应不是有效 JSON")
            }
        }

        let submission = SubmissionResponse { status, body };
        if !submission.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status,
                body: submission.body.to_string(),
            });
        }
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_body_parse() {
        let body = ResponseBody::parse(r#"{"ok": true}"#.to_string());
        assert_eq!(body.as_json(), Some(&json!({"ok": true})));

        let body = ResponseBody::parse("Internal Server Error".to_string());
        assert_eq!(body, ResponseBody::Text("Internal Server Error".to_string()));
        assert_eq!(body.to_string(), "Internal Server Error");
    }

    #[test]
    fn test_is_success() {
        let mut response = SubmissionResponse {
            status: 201,
            body: ResponseBody::Text(String::new()),
        };
        assert!(response.is_success());
        response.status = 422;
        assert!(!response.is_success());
    }
}
