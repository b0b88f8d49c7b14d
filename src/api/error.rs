// ==========================================
// BoM 转 EPD - 外部接口错误类型
// ==========================================
// 职责: 载荷落盘与评分服务提交的错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 提交 =====
    #[error("请求发送失败: {0}")]
    Transport(String),

    #[error("评分服务返回非成功状态码 {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("响应读取失败: {0}")]
    ResponseRead(String),

    // ===== 序列化 / 落盘 =====
    #[error("载荷序列化失败: {0}")]
    Serialization(String),

    #[error("JSON 文件写入失败 ({path}): {message}")]
    OutputWrite { path: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
