// ==========================================
// BoM 转 EPD - 载荷落盘
// ==========================================
// 职责: 将载荷写为 <输出目录>/<EPD 名称>.json（缩进 2）
// 规则: 目录不存在时创建；同名文件直接覆盖
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::Payload;
use std::path::{Path, PathBuf};
use tracing::info;

/// 文件名中不允许出现的字符
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// EPD 名称 → 文件名（不含扩展名）
///
/// 去除首尾空白，路径分隔符等非法字符替换为 '_'
pub fn file_stem_for(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if FORBIDDEN_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "epd".to_string()
    } else {
        cleaned
    }
}

pub struct PayloadWriter {
    output_dir: PathBuf,
}

impl PayloadWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", file_stem_for(name)))
    }

    /// 写出载荷
    ///
    /// # 返回
    /// - 写入的文件路径
    pub fn write(&self, payload: &Payload, name: &str) -> ApiResult<PathBuf> {
        let path = self.path_for(name);
        let write_error = |message: String| ApiError::OutputWrite {
            path: path.display().to_string(),
            message,
        };

        std::fs::create_dir_all(&self.output_dir).map_err(|e| write_error(e.to_string()))?;
        let content = serde_json::to_string_pretty(payload)?;
        std::fs::write(&path, content).map_err(|e| write_error(e.to_string()))?;

        info!(path = %path.display(), components = payload.components.len(), "载荷 JSON 已保存");
        Ok(path)
    }
}
