// ==========================================
// BoM 转 EPD - 领域模型层
// ==========================================
// 职责: 定义物料、映射、载荷实体与类型
// 红线: 不含文件读写,不含网络调用
// ==========================================

pub mod mapping;
pub mod material;
pub mod payload;
pub mod types;

// 重导出核心类型
pub use mapping::MappingEntry;
pub use material::{
    normalize_material_name, BomTotals, ExtractedBom, MaterialLine, ProcessLine, RawRow,
    ResolvedMaterial, StageQuantity, UnresolvedMaterial,
};
pub use payload::{
    Component, Credential, Input, MethodLib, Payload, PayloadComponent, RootComponent,
    RootDescriptor, ROOT_MODULES,
};
pub use types::{EpdUnit, ProcessStage};
