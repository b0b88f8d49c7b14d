// ==========================================
// BoM 转 EPD - 核心库
// ==========================================
// 职责: BoM 表格 → 参考过程映射 → 组件图载荷 → 评分服务
// 技术栈: Rust + calamine/csv + ureq
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部表格
pub mod importer;

// 引擎层 - 映射与组件图
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 外部接口层 - 落盘与提交
pub mod api;

// 应用层 - 前端适配
pub mod app;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    EpdUnit, MappingEntry, MaterialLine, Payload, ProcessLine, ProcessStage, ResolvedMaterial,
    UnresolvedMaterial,
};

pub use engine::{
    EpdPipeline, MaterialPreview, MissingMaterialPolicy, MissingPolicyKind, PipelineError,
    ProgressSink, RunOutcome,
};

pub use config::{ConfigLoader, EpdConfig};

pub use api::{EpdSubmitter, HttpEpdClient};

// ==========================================
// 常量定义
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "BoM 转 EPD";
