// ==========================================
// BoM 转 EPD - 后台运行
// ==========================================
// 职责: 在独立线程中执行管道，保持前端响应
// 说明: 进度与最终结果都经由 ProgressSink 回传
// ==========================================

use crate::engine::{EpdPipeline, PipelineError, PipelineResult, ProgressSink, RunOutcome};
use crate::i18n::{t, t_with_args};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::error;

const WORKER_THREAD_NAME: &str = "bom-to-epd-worker";

pub type RunResult = PipelineResult<Option<RunOutcome>>;

/// 后台运行句柄
pub struct PipelineHandle {
    inner: JoinHandle<RunResult>,
}

impl PipelineHandle {
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// 等待运行结束
    pub fn join(self) -> RunResult {
        self.inner
            .join()
            .map_err(|_| PipelineError::Worker(WORKER_THREAD_NAME.to_string()))?
    }
}

/// 结果摘要（成功 / 取消 / 失败）
pub fn summarize_outcome(result: &RunResult) -> String {
    match result {
        Ok(Some(outcome)) => match outcome.status_code() {
            Some(status) => {
                let dir = outcome
                    .output_path
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                t_with_args(
                    "worker.success",
                    &[("status", &status.to_string()), ("dir", &dir)],
                )
            }
            None => t_with_args(
                "worker.saved_only",
                &[("path", &outcome.output_path.display().to_string())],
            ),
        },
        Ok(None) => t("worker.aborted"),
        Err(err) => t_with_args("worker.failed", &[("error", &err.to_string())]),
    }
}

/// 在后台线程运行管道
///
/// # 参数
/// - pipeline: 已配置的管道（进度出口将被替换为 progress）
/// - progress: 进度接收者，需自行切回界面线程
pub fn spawn_pipeline(
    pipeline: EpdPipeline,
    progress: Arc<dyn ProgressSink>,
) -> PipelineResult<PipelineHandle> {
    let mut pipeline = pipeline.with_progress(progress.clone());

    let inner = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let result = pipeline.run();
            if let Err(err) = &result {
                error!(error = %err, "后台运行失败");
            }
            progress.report(&summarize_outcome(&result));
            result
        })
        .map_err(|e| PipelineError::Worker(e.to_string()))?;

    Ok(PipelineHandle { inner })
}
