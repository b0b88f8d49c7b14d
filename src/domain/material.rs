// ==========================================
// BoM 转 EPD - 材料领域模型
// ==========================================
// 职责: BoM 行 / 物料行 / 汇总量 / 映射后物料
// 生命周期: 单次运行内创建，运行结束即丢弃
// ==========================================

use crate::domain::types::ProcessStage;
use serde::{Deserialize, Serialize};

/// 原始行：按列位置排列的单元格文本
pub type RawRow = Vec<String>;

// ==========================================
// MaterialLine - 物料行
// ==========================================
// 红线: name 已 TRIM（保留大小写），amount > 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub amount: f64,
}

impl MaterialLine {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    /// 连接键：TRIM + 小写
    pub fn join_key(&self) -> String {
        normalize_material_name(&self.name)
    }
}

/// 物料名称规范化（映射表与 BoM 两侧共用）
pub fn normalize_material_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ==========================================
// BomTotals - 包装推断用的两个汇总量
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BomTotals {
    pub total_net: Option<f64>,     // Total net weight material
    pub final_product: Option<f64>, // Final product
}

// ==========================================
// ExtractedBom - 行提取结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedBom {
    pub materials: Vec<MaterialLine>,
    pub totals: BomTotals,
    pub scanned_rows: usize,
    pub skipped_rows: usize,
}

// ==========================================
// ResolvedMaterial - 连接 + 换算后的物料
// ==========================================
// process_uuid_a1 为空 = 未解析
// A3 三个字段仅在 process_uuid_a3 存在时有值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMaterial {
    pub material: String,
    pub amount: f64,
    pub final_amount_a1: f64,
    pub final_unit_a1: String,
    pub process_uuid_a1: Option<String>,
    pub final_amount_a3: Option<f64>,
    pub final_unit_a3: Option<String>,
    pub process_uuid_a3: Option<String>,
}

impl ResolvedMaterial {
    pub fn is_resolved(&self) -> bool {
        self.process_uuid_a1.is_some()
    }

    /// 转为类型化的过程行；未解析时返回缺失物料
    pub fn into_process_line(self) -> Result<ProcessLine, UnresolvedMaterial> {
        let Some(uuid_a1) = self.process_uuid_a1 else {
            return Err(UnresolvedMaterial {
                name: self.material,
                amount: self.amount,
            });
        };

        let a1 = StageQuantity {
            stage: ProcessStage::A1,
            process_uuid: uuid_a1,
            amount: self.final_amount_a1,
            unit: self.final_unit_a1.clone(),
        };

        let a3 = self.process_uuid_a3.map(|uuid_a3| StageQuantity {
            stage: ProcessStage::A3,
            process_uuid: uuid_a3,
            amount: self.final_amount_a3.unwrap_or(0.0),
            unit: self
                .final_unit_a3
                .unwrap_or_else(|| self.final_unit_a1.clone()),
        });

        Ok(ProcessLine {
            material: self.material,
            amount: self.amount,
            a1,
            a3,
        })
    }
}

// ==========================================
// StageQuantity / ProcessLine - 已解析物料
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageQuantity {
    pub stage: ProcessStage,
    pub process_uuid: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessLine {
    pub material: String,
    pub amount: f64,
    pub a1: StageQuantity,
    pub a3: Option<StageQuantity>,
}

impl ProcessLine {
    /// 按 A1 → A3 顺序迭代存在的阶段
    pub fn stages(&self) -> impl Iterator<Item = &StageQuantity> {
        std::iter::once(&self.a1).chain(self.a3.iter())
    }
}

// ==========================================
// UnresolvedMaterial - 缺失映射的物料
// ==========================================
// amount 为换算前的原始数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedMaterial {
    pub name: String,
    pub amount: f64,
}
