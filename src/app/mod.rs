// ==========================================
// BoM 转 EPD - 应用层
// ==========================================
// 职责: 前端适配（后台线程运行、终端确认）
// ==========================================

pub mod terminal;
pub mod worker;

// 重导出
pub use terminal::{is_affirmative, stdin_is_interactive, TerminalConfirmer};
pub use worker::{spawn_pipeline, summarize_outcome, PipelineHandle, RunResult};
