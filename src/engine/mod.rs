// ==========================================
// BoM 转 EPD - 引擎层
// ==========================================
// 职责: 包装推断、过程解析、数量换算、组件图构建、管道编排
// 红线: 外部读写只经由数据源 / 写出器 / 提交器 trait
// ==========================================

pub mod converter;
pub mod error;
pub mod graph_builder;
pub mod missing_policy;
pub mod packaging;
pub mod pipeline;
pub mod preview;
pub mod progress;
pub mod resolver;

// 重导出核心引擎
pub use converter::{QuantityConverter, DEFAULT_UNIT};
pub use error::{PipelineError, PipelineResult};
pub use graph_builder::{
    GraphBuilder, IdSource, MaterialGraph, PayloadHeader, RandomIds, SequentialIds,
};
pub use missing_policy::{
    format_missing_report, AutoAbortOnMissing, AutoSkip, Confirmer, InteractiveConfirm,
    MissingDecision, MissingMaterialPolicy, MissingPolicyKind,
};
pub use packaging::{PackagingInferencer, PACKAGING_LABELS};
pub use pipeline::{EpdPipeline, RunOutcome};
pub use preview::{MaterialPreview, PreviewFound, PreviewMissing};
pub use progress::{NullSink, ProgressSink, TracingSink};
pub use resolver::{DuplicateKeyPolicy, JoinedMaterial, ProcessResolver, Resolution};
