// ==========================================
// BoM 转 EPD - 映射表领域模型
// ==========================================
// 职责: 物料名 → A1/A3 参考过程（单位 + 换算系数）
// 生命周期: 每次运行加载一次，运行期间只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MappingEntry - 映射表行
// ==========================================
// 连接键 material_name_norm 不保证唯一
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingEntry {
    pub material_name_norm: String,

    // ===== A1 原材料过程 =====
    pub process_unit_a1: Option<String>,
    pub process_uuid_a1: Option<String>,
    pub conversion_factor_a1: Option<f64>,

    // ===== A3 制造过程（可选）=====
    pub process_unit_a3: Option<String>,
    pub process_uuid_a3: Option<String>,
    pub conversion_factor_a3: Option<f64>,

    // 源表行号（1 起，含表头），用于日志定位
    #[serde(default)]
    pub row_number: usize,
}

impl MappingEntry {
    /// 以规范化名称创建空条目
    pub fn for_material(name: &str) -> Self {
        Self {
            material_name_norm: crate::domain::material::normalize_material_name(name),
            ..Self::default()
        }
    }

    pub fn with_a1(mut self, unit: &str, uuid: &str, factor: Option<f64>) -> Self {
        self.process_unit_a1 = Some(unit.to_string());
        self.process_uuid_a1 = Some(uuid.to_string());
        self.conversion_factor_a1 = factor;
        self
    }

    pub fn with_a3(mut self, unit: Option<&str>, uuid: &str, factor: Option<f64>) -> Self {
        self.process_unit_a3 = unit.map(str::to_string);
        self.process_uuid_a3 = Some(uuid.to_string());
        self.conversion_factor_a3 = factor;
        self
    }
}
