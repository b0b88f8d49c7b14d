// ==========================================
// BoM 转 EPD - 行提取器
// ==========================================
// 职责: 原始行 → 物料行 + 两个汇总量
// 流程: 跳过偏移行 → 读物料/数量列 → 过滤 → 分类
// 红线: 纯变换，不报错；非法数量降级为 0.0 后被过滤
// ==========================================

use crate::domain::{BomTotals, ExtractedBom, MaterialLine, RawRow};
use crate::importer::data_cleaner::DataCleaner;
use tracing::{debug, trace};

/// 汇总行标签（大小写不敏感前缀匹配）
pub const TOTAL_NET_LABEL: &str = "total net weight material";
pub const FINAL_PRODUCT_LABEL: &str = "final product";

/// 默认列位置（C 列物料名，E 列数量）
pub const DEFAULT_MATERIAL_COLUMN: usize = 2;
pub const DEFAULT_AMOUNT_COLUMN: usize = 4;

/// 行分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    TotalNet,
    FinalProduct,
    Material,
}

fn classify(name: &str) -> RowKind {
    let lower = name.to_lowercase();
    if lower.starts_with(TOTAL_NET_LABEL) {
        RowKind::TotalNet
    } else if lower.starts_with(FINAL_PRODUCT_LABEL) {
        RowKind::FinalProduct
    } else {
        RowKind::Material
    }
}

// ==========================================
// RowExtractor
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowExtractor {
    pub start_row: usize,
    pub material_column: usize,
    pub amount_column: usize,
}

impl Default for RowExtractor {
    fn default() -> Self {
        Self {
            start_row: 0,
            material_column: DEFAULT_MATERIAL_COLUMN,
            amount_column: DEFAULT_AMOUNT_COLUMN,
        }
    }
}

impl RowExtractor {
    pub fn new(start_row: usize, material_column: usize, amount_column: usize) -> Self {
        Self {
            start_row,
            material_column,
            amount_column,
        }
    }

    /// 提取物料行与汇总量
    ///
    /// # 规则
    /// - 物料名为空或 "nan" → 跳过
    /// - 数量 ≤ 0（含解析失败）→ 跳过
    /// - 汇总行更新 total_net / final_product，不进入物料列表（重复出现时取最后一个）
    pub fn extract(&self, rows: &[RawRow]) -> ExtractedBom {
        let cleaner = DataCleaner;
        let mut materials = Vec::new();
        let mut totals = BomTotals::default();
        let mut scanned_rows = 0;
        let mut skipped_rows = 0;

        for (offset, row) in rows.iter().enumerate().skip(self.start_row) {
            scanned_rows += 1;

            let name = cleaner.clean_text(cell(row, self.material_column));
            if cleaner.is_blank_material(&name) {
                skipped_rows += 1;
                continue;
            }

            let amount = cleaner.parse_amount(cell(row, self.amount_column));
            if amount <= 0.0 {
                trace!(row = offset, material = %name, "数量非正，跳过");
                skipped_rows += 1;
                continue;
            }

            match classify(&name) {
                RowKind::TotalNet => {
                    debug!(row = offset, amount, "识别到净重汇总行");
                    totals.total_net = Some(amount);
                }
                RowKind::FinalProduct => {
                    debug!(row = offset, amount, "识别到成品重量行");
                    totals.final_product = Some(amount);
                }
                RowKind::Material => materials.push(MaterialLine::new(name, amount)),
            }
        }

        ExtractedBom {
            materials,
            totals,
            scanned_rows,
            skipped_rows,
        }
    }
}

fn cell(row: &RawRow, index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
