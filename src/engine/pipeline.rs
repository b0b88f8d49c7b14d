// ==========================================
// BoM 转 EPD - 管道编排器
// ==========================================
// 职责: 协调一次完整运行
// 流程:
//   1. 读取 BoM 行 → 提取物料与汇总量
//   2. 推断包装行
//   3. 加载映射表 → 左连接 → 数量换算 → 分区
//   4. 缺失物料策略（唯一可取消点）
//   5. 构建组件图 → 组装载荷 → 完整性校验
//   6. 写出 JSON → 提交评分服务（可关闭）
// 红线: 每次运行独立构造全部状态，运行间不共享可变数据
// ==========================================

use crate::api::epd_client::{EpdSubmitter, HttpEpdClient, SubmissionResponse};
use crate::api::payload_writer::PayloadWriter;
use crate::config::EpdConfig;
use crate::domain::{MaterialLine, Payload, ProcessLine, UnresolvedMaterial};
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::graph_builder::{GraphBuilder, IdSource, PayloadHeader, RandomIds};
use crate::engine::missing_policy::{
    format_missing_report, MissingDecision, MissingMaterialPolicy,
};
use crate::engine::packaging::PackagingInferencer;
use crate::engine::preview::MaterialPreview;
use crate::engine::progress::{NullSink, ProgressSink};
use crate::engine::resolver::{ProcessResolver, Resolution};
use crate::i18n::{t, t_with_args};
use crate::importer::{BomSource, FileBomSource, FileMappingSource, MappingSource, RowExtractor};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RunOutcome - 成功运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub payload: Payload,
    pub output_path: PathBuf,
    /// None = 未提交（已关闭提交）
    pub submission: Option<SubmissionResponse>,
    pub resolved: Vec<ProcessLine>,
    /// 因缺少 A1 UUID 被丢弃的物料
    pub dropped: Vec<UnresolvedMaterial>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn status_code(&self) -> Option<u16> {
        self.submission.as_ref().map(|s| s.status)
    }
}

// ==========================================
// EpdPipeline
// ==========================================
pub struct EpdPipeline {
    config: EpdConfig,
    bom_source: Box<dyn BomSource>,
    mapping_source: Box<dyn MappingSource>,
    policy: Box<dyn MissingMaterialPolicy>,
    submitter: Option<Box<dyn EpdSubmitter>>,
    progress: Arc<dyn ProgressSink>,
    ids: Box<dyn IdSource>,
}

impl EpdPipeline {
    /// 以显式数据源创建管道
    ///
    /// # 说明
    /// - 缺失物料策略取自配置；没有交互通道，Confirm 视为拒绝
    /// - 提交器在运行时按配置创建，可用 with_submitter 替换
    pub fn new(
        config: EpdConfig,
        bom_source: Box<dyn BomSource>,
        mapping_source: Box<dyn MappingSource>,
    ) -> Self {
        let policy = config
            .effective_missing_policy(false)
            .into_policy(|_: &str| false);
        Self {
            config,
            bom_source,
            mapping_source,
            policy,
            submitter: None,
            progress: Arc::new(NullSink),
            ids: Box::new(RandomIds),
        }
    }

    /// 以配置中的文件路径创建管道
    pub fn from_config(config: EpdConfig) -> PipelineResult<Self> {
        config.validate_source()?;
        let delimiter = config.source.csv_delimiter_byte()?;
        let bom_source = FileBomSource::new(
            config.source.bom_path.clone(),
            config.source.sheet_name.clone(),
            delimiter,
        );
        let mapping_source = FileMappingSource::new(config.source.mapping_path.clone(), delimiter);
        Ok(Self::new(
            config,
            Box::new(bom_source),
            Box::new(mapping_source),
        ))
    }

    pub fn with_policy(mut self, policy: Box<dyn MissingMaterialPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_submitter(mut self, submitter: Box<dyn EpdSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self.config.api.submit = true;
        self
    }

    /// 只生成 JSON，不提交
    pub fn without_submission(mut self) -> Self {
        self.submitter = None;
        self.config.api.submit = false;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_id_source(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &EpdConfig {
        &self.config
    }

    fn notify(&self, message: String) {
        self.progress.report(&message);
    }

    /// 步骤 1-3: 读取、包装推断、解析
    pub fn resolve_materials(&self) -> PipelineResult<Resolution> {
        let source = &self.config.source;
        let extractor = RowExtractor::new(
            source.start_row,
            source.material_column_index()?,
            source.amount_column_index()?,
        );

        self.notify(t_with_args(
            "pipeline.reading_bom",
            &[("source", &self.bom_source.describe())],
        ));
        let rows = self.bom_source.read_rows()?;
        let extracted = extractor.extract(&rows);
        info!(
            scanned = extracted.scanned_rows,
            skipped = extracted.skipped_rows,
            materials = extracted.materials.len(),
            total_net = ?extracted.totals.total_net,
            final_product = ?extracted.totals.final_product,
            "BoM 行提取完成"
        );

        let mut materials: Vec<MaterialLine> = extracted.materials;
        let added = PackagingInferencer.apply(&mut materials, &extracted.totals);
        if added > 0 {
            let share = format!("{:.4}", materials[materials.len() - 1].amount);
            self.notify(t_with_args(
                "pipeline.packaging_added",
                &[("count", &added.to_string()), ("share", &share)],
            ));
        }

        self.notify(t_with_args(
            "pipeline.loading_mapping",
            &[("source", &self.mapping_source.describe())],
        ));
        let entries = self.mapping_source.load_entries()?;
        let resolver = ProcessResolver::new(entries, self.config.duplicate_mapping)?;
        let resolution = resolver.resolve(&materials);

        self.notify(t_with_args(
            "pipeline.resolved",
            &[
                ("resolved", &resolution.lines.len().to_string()),
                ("missing", &resolution.unresolved.len().to_string()),
            ],
        ));
        Ok(resolution)
    }

    /// 映射预览（不构建载荷、不写文件、不提交）
    pub fn preview(&self) -> PipelineResult<MaterialPreview> {
        self.config.validate_source()?;
        let resolution = self.resolve_materials()?;
        Ok(MaterialPreview::from_resolution(&resolution))
    }

    /// 步骤 5: 过程行 → 载荷
    pub fn build_payload(&mut self, lines: &[ProcessLine]) -> PipelineResult<Payload> {
        let header = PayloadHeader {
            full_name: self.config.epd.name.clone(),
            unit: self.config.epd.unit,
            target_repository: self.config.repositories.target.clone(),
            auth: self.config.resolve_credentials()?,
            method_lib: self.config.method_lib.clone(),
        };

        let builder = GraphBuilder::new(self.config.repositories.root.clone());
        let graph = builder.build(lines, self.ids.as_mut());
        let payload = builder.assemble(graph, header, self.ids.as_mut());
        payload
            .check_integrity()
            .map_err(PipelineError::Integrity)?;
        Ok(payload)
    }

    /// 执行完整运行
    ///
    /// # 返回
    /// - Ok(Some): 载荷已写出（且按配置已提交）
    /// - Ok(None): 缺失物料策略中止，未写文件、未提交
    /// - Err: 读取 / 配置 / 校验 / 写出 / 提交失败
    #[instrument(skip(self), fields(epd = %self.config.epd.name))]
    pub fn run(&mut self) -> PipelineResult<Option<RunOutcome>> {
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        // 配置与密钥先行校验，避免读完文件才失败
        self.config.validate()?;
        self.config.resolve_credentials()?;
        let http_client = match (&self.submitter, self.config.api.submit) {
            (None, true) => Some(HttpEpdClient::new(
                self.config.api.url.clone(),
                self.config.api_key()?,
            )),
            _ => None,
        };

        let resolution = self.resolve_materials()?;

        if resolution.has_missing() {
            let report = format_missing_report(&resolution.unresolved);
            warn!(
                missing = resolution.unresolved.len(),
                policy = self.policy.name(),
                "存在未映射 A1 UUID 的物料"
            );
            self.notify(report);

            match self.policy.decide(&resolution.unresolved) {
                MissingDecision::Proceed => self.notify(t("missing.skipped")),
                MissingDecision::Abort => {
                    info!(%run_id, "运行已按缺失物料策略中止");
                    self.notify(t("pipeline.aborted"));
                    return Ok(None);
                }
            }
        }

        let Resolution {
            lines, unresolved, ..
        } = resolution;

        let payload = self.build_payload(&lines)?;
        self.notify(t_with_args(
            "pipeline.payload_built",
            &[("components", &payload.components.len().to_string())],
        ));

        let writer = PayloadWriter::new(self.config.output_dir.clone());
        let output_path = writer.write(&payload, &self.config.epd.name)?;
        self.notify(t_with_args(
            "pipeline.payload_written",
            &[("path", &output_path.display().to_string())],
        ));

        let submission = if self.config.api.submit {
            self.notify(t("pipeline.submitting"));
            let submitter: &dyn EpdSubmitter = match (&self.submitter, &http_client) {
                (Some(injected), _) => injected.as_ref(),
                (None, Some(client)) => client,
                (None, None) => {
                    return Err(PipelineError::Integrity(
                        "提交已启用但未配置提交器".to_string(),
                    ))
                }
            };
            let response = submitter.submit(&payload)?;
            self.notify(t_with_args(
                "pipeline.status_code",
                &[("status", &response.status.to_string())],
            ));
            self.notify(t_with_args(
                "pipeline.response",
                &[("body", &response.body.to_string())],
            ));
            Some(response)
        } else {
            self.notify(t("pipeline.submission_skipped"));
            None
        };

        let finished_at = Utc::now();
        info!(
            %run_id,
            components = payload.components.len(),
            dropped = unresolved.len(),
            status = ?submission.as_ref().map(|s| s.status),
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "运行完成"
        );

        Ok(Some(RunOutcome {
            run_id,
            payload,
            output_path,
            submission,
            resolved: lines,
            dropped: unresolved,
            started_at,
            finished_at,
        }))
    }
}
