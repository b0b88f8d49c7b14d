// ==========================================
// BoM 转 EPD - 配置错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("配置文件读取失败: {0}")]
    ReadError(String),

    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    #[error("列引用无效: {0}（应为从 0 开始的序号或列字母，如 C）")]
    InvalidColumn(String),

    #[error("缺少必需配置: {0}")]
    MissingField(String),

    #[error("缺少密钥，请设置环境变量 {0}")]
    MissingSecret(String),

    #[error("配置值无效: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::ReadError(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
