// ==========================================
// BoM 转 EPD - 数量换算
// ==========================================
// 职责: 连接结果 → 各阶段最终数量与单位
// 规则:
//   A1: unit = process_unit_a1 或 "kg"; amount = amount * (factor_a1 或 1.0)
//   A3: 仅当 process_uuid_a3 存在
//       amount = final_amount_a1 * (factor_a3 或 1.0)   ← 在 A1 换算结果上复合
//       unit   = process_unit_a3 或 final_unit_a1
// ==========================================

use crate::domain::ResolvedMaterial;
use crate::engine::resolver::JoinedMaterial;

/// 映射表未给出单位时的默认单位
pub const DEFAULT_UNIT: &str = "kg";

pub struct QuantityConverter;

impl QuantityConverter {
    pub fn convert(&self, joined: &JoinedMaterial<'_>) -> ResolvedMaterial {
        let material = joined.material;
        let mapping = joined.mapping;

        let final_unit_a1 = mapping
            .and_then(|m| m.process_unit_a1.clone())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());
        let factor_a1 = mapping.and_then(|m| m.conversion_factor_a1).unwrap_or(1.0);
        let final_amount_a1 = material.amount * factor_a1;

        let process_uuid_a3 = mapping.and_then(|m| m.process_uuid_a3.clone());
        let (final_amount_a3, final_unit_a3) = match (&process_uuid_a3, mapping) {
            (Some(_), Some(m)) => {
                let factor_a3 = m.conversion_factor_a3.unwrap_or(1.0);
                let unit_a3 = m
                    .process_unit_a3
                    .clone()
                    .unwrap_or_else(|| final_unit_a1.clone());
                (Some(final_amount_a1 * factor_a3), Some(unit_a3))
            }
            _ => (None, None),
        };

        ResolvedMaterial {
            material: material.name.clone(),
            amount: material.amount,
            final_amount_a1,
            final_unit_a1,
            process_uuid_a1: mapping.and_then(|m| m.process_uuid_a1.clone()),
            final_amount_a3,
            final_unit_a3,
            process_uuid_a3,
        }
    }

    pub fn convert_all(&self, joined: &[JoinedMaterial<'_>]) -> Vec<ResolvedMaterial> {
        joined.iter().map(|j| self.convert(j)).collect()
    }
}
