// ==========================================
// BoM 转 EPD - 管道错误类型
// ==========================================
// 职责: 汇总导入 / 配置 / 外部接口错误
// ==========================================

use crate::api::error::ApiError;
use crate::config::error::ConfigError;
use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("组件图校验失败: {0}")]
    Integrity(String),

    #[error("后台任务异常退出: {0}")]
    Worker(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
