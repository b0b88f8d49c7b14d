// ==========================================
// BoM 转 EPD - 外部接口层
// ==========================================
// 职责: 载荷 JSON 落盘 + 评分服务提交
// ==========================================

pub mod epd_client;
pub mod error;
pub mod payload_writer;

// 重导出核心类型
pub use epd_client::{EpdSubmitter, HttpEpdClient, ResponseBody, SubmissionResponse};
pub use error::{ApiError, ApiResult};
pub use payload_writer::{file_stem_for, PayloadWriter};
