// ==========================================
// BoM 转 EPD - 领域类型定义
// ==========================================
// 职责: EPD 单位枚举 / 生命周期阶段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// EPD 声明单位 (EPD Unit)
// ==========================================
// 序列化格式: 与评分服务约定的显示标签一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EpdUnit {
    #[default]
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "Item(s)")]
    Items,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "m²", alias = "m2")]
    SquareMeter,
    #[serde(rename = "m³", alias = "m3")]
    CubicMeter,
    #[serde(rename = "t")]
    Tonne,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "l")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
}

impl EpdUnit {
    /// 所有可选单位（按界面顺序）
    pub const ALL: [EpdUnit; 9] = [
        EpdUnit::Kg,
        EpdUnit::Items,
        EpdUnit::Meter,
        EpdUnit::SquareMeter,
        EpdUnit::CubicMeter,
        EpdUnit::Tonne,
        EpdUnit::Gram,
        EpdUnit::Liter,
        EpdUnit::Milliliter,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EpdUnit::Kg => "kg",
            EpdUnit::Items => "Item(s)",
            EpdUnit::Meter => "m",
            EpdUnit::SquareMeter => "m²",
            EpdUnit::CubicMeter => "m³",
            EpdUnit::Tonne => "t",
            EpdUnit::Gram => "g",
            EpdUnit::Liter => "l",
            EpdUnit::Milliliter => "ml",
        }
    }
}

impl fmt::Display for EpdUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EpdUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "m2" => return Ok(EpdUnit::SquareMeter),
            "m3" => return Ok(EpdUnit::CubicMeter),
            "item" | "items" | "Item" | "Items" => return Ok(EpdUnit::Items),
            _ => {}
        }
        EpdUnit::ALL
            .iter()
            .copied()
            .find(|u| u.label() == trimmed)
            .ok_or_else(|| {
                let allowed: Vec<&str> = EpdUnit::ALL.iter().map(|u| u.label()).collect();
                format!("未知的 EPD 单位: {}（可选: {}）", trimmed, allowed.join(", "))
            })
    }
}

// ==========================================
// 生命周期阶段 (Process Stage)
// ==========================================
// A1: 原材料供应 / A3: 制造
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessStage {
    A1,
    A3,
}

impl ProcessStage {
    /// 组件名称后缀
    pub fn component_suffix(&self) -> &'static str {
        match self {
            ProcessStage::A1 => "(A1)",
            ProcessStage::A3 => "(A3 process)",
        }
    }
}

impl fmt::Display for ProcessStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessStage::A1 => write!(f, "A1"),
            ProcessStage::A3 => write!(f, "A3"),
        }
    }
}
