// ==========================================
// BoM 转 EPD - 包装推断
// ==========================================
// 职责: 由净重与成品重量推断包装物料行
// 规则: 包装重量 = final_product - total_net，三等分到托盘/纸箱/薄膜
// 红线: 标签与等分规则固定，下游按这三个标签映射
// ==========================================

use crate::domain::{BomTotals, MaterialLine};
use tracing::debug;

pub const PACKAGING_PALLET: &str = "Packaging pallet";
pub const PACKAGING_CARTON: &str = "Packaging carton";
pub const PACKAGING_FILM: &str = "Packaging film";

/// 包装行标签（追加顺序）
pub const PACKAGING_LABELS: [&str; 3] = [PACKAGING_PALLET, PACKAGING_CARTON, PACKAGING_FILM];

pub struct PackagingInferencer;

impl PackagingInferencer {
    /// 计算包装行
    ///
    /// # 规则
    /// - 两个汇总量都存在且 final_product > total_net → 3 行，每行 (final - net) / 3
    /// - 其他情况 → 空
    pub fn infer(&self, totals: &BomTotals) -> Vec<MaterialLine> {
        match (totals.total_net, totals.final_product) {
            (Some(total_net), Some(final_product)) if final_product > total_net => {
                let share = (final_product - total_net) / 3.0;
                PACKAGING_LABELS
                    .iter()
                    .map(|label| MaterialLine::new(*label, share))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// 将包装行追加到物料列表末尾，返回追加行数
    pub fn apply(&self, materials: &mut Vec<MaterialLine>, totals: &BomTotals) -> usize {
        let lines = self.infer(totals);
        let added = lines.len();
        if added > 0 {
            debug!(share = lines[0].amount, "追加包装物料行");
        }
        materials.extend(lines);
        added
    }
}
