// ==========================================
// BoM 转 EPD - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析与数据源接口（不包含实现）
// ==========================================

use crate::domain::{MappingEntry, RawRow};
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析为无表头的原始行（按绝对行/列位置）
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 工作表名（None 或空串 = 第一个工作表；CSV 忽略）
    fn parse_rows(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Vec<RawRow>>;

    /// 解析为带表头的行记录（HashMap<列名, 值>）
    ///
    /// # 说明
    /// - 第一行为表头
    /// - 完全空白的行被跳过
    fn parse_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>>;
}

// ==========================================
// BomSource Trait
// ==========================================
// 用途: 向管道提供 BoM 原始行
pub trait BomSource: Send + Sync {
    fn read_rows(&self) -> ImportResult<Vec<RawRow>>;

    /// 数据源描述（用于日志）
    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

// ==========================================
// MappingSource Trait
// ==========================================
// 用途: 向管道提供映射表条目
pub trait MappingSource: Send + Sync {
    fn load_entries(&self) -> ImportResult<Vec<MappingEntry>>;

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

// 内存数据源（测试与嵌入调用）
impl BomSource for Vec<RawRow> {
    fn read_rows(&self) -> ImportResult<Vec<RawRow>> {
        Ok(self.clone())
    }
}

impl MappingSource for Vec<MappingEntry> {
    fn load_entries(&self) -> ImportResult<Vec<MappingEntry>> {
        Ok(self.clone())
    }
}
