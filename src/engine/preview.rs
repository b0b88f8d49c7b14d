// ==========================================
// BoM 转 EPD - 映射预览
// ==========================================
// 职责: 提交前查看哪些物料已映射、哪些缺失
// 规则: 缺失物料排在前面；数量保留 4 位小数
// ==========================================

use crate::domain::ResolvedMaterial;
use crate::engine::resolver::Resolution;
use crate::i18n::t_with_args;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewFound {
    pub material: String,
    /// A1 换算后数量
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewMissing {
    pub material: String,
    /// 原始数量
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreview {
    pub missing: Vec<PreviewMissing>,
    pub found: Vec<PreviewFound>,
}

impl MaterialPreview {
    pub fn from_rows(rows: &[ResolvedMaterial]) -> Self {
        let mut preview = MaterialPreview::default();
        for row in rows {
            if row.is_resolved() {
                preview.found.push(PreviewFound {
                    material: row.material.clone(),
                    amount: row.final_amount_a1,
                    unit: row.final_unit_a1.clone(),
                });
            } else {
                preview.missing.push(PreviewMissing {
                    material: row.material.clone(),
                    amount: row.amount,
                });
            }
        }
        preview
    }

    pub fn from_resolution(resolution: &Resolution) -> Self {
        Self::from_rows(&resolution.rows)
    }

    /// 文本表格（终端输出）
    pub fn render(&self) -> String {
        let width = self
            .missing
            .iter()
            .map(|m| m.material.chars().count())
            .chain(self.found.iter().map(|f| f.material.chars().count()))
            .max()
            .unwrap_or(0)
            .max(8);

        let mut out = String::new();
        if !self.missing.is_empty() {
            let count = self.missing.len().to_string();
            out.push_str(&t_with_args("preview.missing_title", &[("count", &count)]));
            out.push('\n');
            for item in &self.missing {
                out.push_str(&format!(
                    "  {:<width$}  {:>14.4}\n",
                    item.material,
                    item.amount,
                    width = width
                ));
            }
            out.push('\n');
        }

        let count = self.found.len().to_string();
        out.push_str(&t_with_args("preview.found_title", &[("count", &count)]));
        out.push('\n');
        for item in &self.found {
            out.push_str(&format!(
                "  {:<width$}  {:>14.4}  {}\n",
                item.material,
                item.amount,
                item.unit,
                width = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, amount: f64, uuid: Option<&str>) -> ResolvedMaterial {
        ResolvedMaterial {
            material: name.to_string(),
            amount,
            final_amount_a1: amount * 2.0,
            final_unit_a1: "kg".to_string(),
            process_uuid_a1: uuid.map(str::to_string),
            final_amount_a3: None,
            final_unit_a3: None,
            process_uuid_a3: None,
        }
    }

    #[test]
    fn test_preview_splits_found_and_missing() {
        let preview = MaterialPreview::from_rows(&[
            row("Steel", 10.0, Some("uuid")),
            row("Wood", 3.0, None),
        ]);

        assert_eq!(preview.found.len(), 1);
        assert_eq!(preview.found[0].amount, 20.0);
        assert_eq!(preview.missing.len(), 1);
        // 缺失物料展示原始数量
        assert_eq!(preview.missing[0].amount, 3.0);
    }

    #[test]
    fn test_render_missing_first_with_four_decimals() {
        let preview = MaterialPreview::from_rows(&[
            row("Steel", 10.0, Some("uuid")),
            row("Wood", 3.0, None),
        ]);
        let text = preview.render();

        let wood = text.find("Wood").unwrap();
        let steel = text.find("Steel").unwrap();
        assert!(wood < steel);
        assert!(text.contains("3.0000"));
        assert!(text.contains("20.0000"));
    }

    #[test]
    fn test_render_without_missing_section() {
        let preview = MaterialPreview::from_rows(&[row("Steel", 1.0, Some("uuid"))]);
        let text = preview.render();
        assert!(!text.contains("3.0000"));
        assert!(text.contains("2.0000  kg"));
    }
}
