// ==========================================
// BoM 转 EPD - 组件图构建
// ==========================================
// 职责: 已解析过程行 → 组件 + 根 Input 列表 → 完整载荷
// 规则:
//   - 每个存在的阶段 (A1 / A3) 生成一个组件 + 一个 Input
//   - 组件名: "<物料> (A1)" / "<物料> (A3 process)"
//   - 过程组件指向根仓库，根组件指向目标仓库
//   - 根组件最后分配 ID，追加在 components 末尾
// ==========================================

use crate::domain::{
    Component, Credential, EpdUnit, Input, MethodLib, Payload, PayloadComponent, ProcessLine,
    RootComponent, RootDescriptor, ROOT_MODULES,
};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// IdSource - 组件 ID 来源
// ==========================================

/// 组件 ID 生成器（测试中替换为确定性实现）
pub trait IdSource: Send {
    fn next_id(&mut self) -> Uuid;
}

/// 随机 v4 UUID
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// 递增序列 UUID（确定性）
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    pub fn new(start: u128) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

// ==========================================
// MaterialGraph / PayloadHeader
// ==========================================

/// 过程组件及根组件的 Input（两者一一对应、顺序一致）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialGraph {
    pub components: Vec<Component>,
    pub inputs: Vec<Input>,
}

/// 载荷中与物料无关的部分
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadHeader {
    pub full_name: String,
    pub unit: EpdUnit,
    pub target_repository: String,
    pub auth: Vec<Credential>,
    pub method_lib: MethodLib,
}

// ==========================================
// GraphBuilder
// ==========================================
pub struct GraphBuilder {
    root_repository: String,
}

impl GraphBuilder {
    /// # 参数
    /// - root_repository: 参考过程所在仓库 URL
    pub fn new(root_repository: impl Into<String>) -> Self {
        Self {
            root_repository: root_repository.into(),
        }
    }

    /// 构建过程组件与 Input
    ///
    /// 顺序: 按过程行顺序，每行先 A1 后 A3
    pub fn build(&self, lines: &[ProcessLine], ids: &mut dyn IdSource) -> MaterialGraph {
        let mut graph = MaterialGraph::default();

        for line in lines {
            for stage in line.stages() {
                let id = ids.next_id();
                graph.components.push(Component {
                    id,
                    name: format!("{} {}", line.material, stage.stage.component_suffix()),
                    epd: stage.process_uuid.clone(),
                    repository: self.root_repository.clone(),
                });
                graph.inputs.push(Input {
                    component: id,
                    amount: stage.amount,
                    unit: stage.unit.clone(),
                });
            }
        }

        debug!(
            lines = lines.len(),
            components = graph.components.len(),
            "组件图构建完成"
        );
        graph
    }

    /// 组装完整载荷
    ///
    /// 根组件 ID 在全部过程组件之后分配
    pub fn assemble(
        &self,
        graph: MaterialGraph,
        header: PayloadHeader,
        ids: &mut dyn IdSource,
    ) -> Payload {
        let root_id = ids.next_id();

        let mut components: Vec<PayloadComponent> = graph
            .components
            .into_iter()
            .map(PayloadComponent::Process)
            .collect();
        components.push(PayloadComponent::Root(RootComponent {
            id: root_id,
            name: header.full_name.trim().to_string(),
            inputs: graph.inputs,
            repository: header.target_repository,
        }));

        Payload {
            auth: header.auth,
            method_lib: header.method_lib,
            root: RootDescriptor {
                component: root_id,
                amount: 1,
                unit: header.unit,
                modules: vec![ROOT_MODULES.to_string()],
            },
            components,
        }
    }
}
