// ==========================================
// BoM 转 EPD - 载荷领域模型
// ==========================================
// 职责: 提交给评分服务的 JSON 载荷结构
// 对齐: 评分服务 run-epd-tree 接口字段名
// ==========================================

use crate::domain::types::EpdUnit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// 根组件引用的生命周期模块
pub const ROOT_MODULES: &str = "A1-A3";

// ==========================================
// Credential / MethodLib
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub url: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodLib {
    pub url: String,
    pub name: String,
}

// ==========================================
// Component / Input / RootComponent
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: Uuid,
    pub name: String,
    /// 参考过程 UUID
    pub epd: String,
    pub repository: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub component: Uuid,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootComponent {
    pub id: Uuid,
    pub name: String,
    pub inputs: Vec<Input>,
    pub repository: String,
}

/// components 列表元素：普通组件或根组件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadComponent {
    Root(RootComponent),
    Process(Component),
}

impl PayloadComponent {
    pub fn id(&self) -> Uuid {
        match self {
            PayloadComponent::Root(root) => root.id,
            PayloadComponent::Process(component) => component.id,
        }
    }
}

// ==========================================
// RootDescriptor / Payload
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDescriptor {
    pub component: Uuid,
    pub amount: u32,
    pub unit: EpdUnit,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub auth: Vec<Credential>,
    #[serde(rename = "methodLib")]
    pub method_lib: MethodLib,
    pub root: RootDescriptor,
    pub components: Vec<PayloadComponent>,
}

impl Payload {
    /// 根组件（按约定位于 components 末尾）
    pub fn root_component(&self) -> Option<&RootComponent> {
        self.components.iter().rev().find_map(|c| match c {
            PayloadComponent::Root(root) if root.id == self.root.component => Some(root),
            _ => None,
        })
    }

    /// 普通（过程）组件
    pub fn process_components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter_map(|c| match c {
            PayloadComponent::Process(component) => Some(component),
            PayloadComponent::Root(_) => None,
        })
    }

    /// 校验组件图引用完整性
    ///
    /// # 规则
    /// - 组件 ID 全局唯一（根组件 ID 不得复用）
    /// - root.component 指向一个根组件
    /// - 每个 Input.component 恰好指向一个普通组件
    pub fn check_integrity(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for component in &self.components {
            if !seen.insert(component.id()) {
                return Err(format!("组件 ID 重复: {}", component.id()));
            }
        }

        let root = self
            .root_component()
            .ok_or_else(|| format!("根组件缺失: {}", self.root.component))?;

        let process_ids: HashSet<Uuid> = self.process_components().map(|c| c.id).collect();
        for input in &root.inputs {
            if !process_ids.contains(&input.component) {
                return Err(format!("Input 引用的组件不存在: {}", input.component));
            }
        }

        Ok(())
    }
}
