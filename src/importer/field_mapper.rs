// ==========================================
// BoM 转 EPD - 映射表字段映射器
// ==========================================
// 职责: 映射表行记录 → MappingEntry + 类型转换
// 表头: Material_name / Process_unit_A1 / Process_uuid_A1 / Conversion_factor_A1
//       Process_unit_A3 / Process_uuid_A3 / Conversion_factor_A3
// ==========================================

use crate::domain::{normalize_material_name, MappingEntry};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;
use tracing::warn;

pub const COL_MATERIAL_NAME: &str = "Material_name";
pub const COL_PROCESS_UNIT_A1: &str = "Process_unit_A1";
pub const COL_PROCESS_UUID_A1: &str = "Process_uuid_A1";
pub const COL_CONVERSION_FACTOR_A1: &str = "Conversion_factor_A1";
pub const COL_PROCESS_UNIT_A3: &str = "Process_unit_A3";
pub const COL_PROCESS_UUID_A3: &str = "Process_uuid_A3";
pub const COL_CONVERSION_FACTOR_A3: &str = "Conversion_factor_A3";

const MATERIAL_NAME_ALIASES: &[&str] = &[COL_MATERIAL_NAME, "Material", "Materialname"];

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl FieldMapper {
    /// 映射全部行记录
    ///
    /// # 说明
    /// - 表头匹配大小写不敏感
    /// - 必需列: Material_name
    /// - 物料名为空的行被跳过
    /// - 行号从 2 起（第 1 行为表头）
    pub fn map_records(
        &self,
        records: Vec<HashMap<String, String>>,
    ) -> ImportResult<Vec<MappingEntry>> {
        let mut entries = Vec::with_capacity(records.len());
        let mut saw_name_column = records.is_empty();

        for (idx, record) in records.into_iter().enumerate() {
            let row = lowercase_keys(record);
            if MATERIAL_NAME_ALIASES
                .iter()
                .any(|alias| row.contains_key(&alias.to_lowercase()))
            {
                saw_name_column = true;
            }
            if let Some(entry) = self.map_to_entry(&row, idx + 2) {
                entries.push(entry);
            }
        }

        if !saw_name_column {
            return Err(ImportError::MissingColumn(COL_MATERIAL_NAME.to_string()));
        }

        Ok(entries)
    }

    fn map_to_entry(&self, row: &HashMap<String, String>, row_number: usize) -> Option<MappingEntry> {
        let name = self.get_string(row, COL_MATERIAL_NAME)?;

        Some(MappingEntry {
            material_name_norm: normalize_material_name(&name),
            process_unit_a1: self.get_string(row, COL_PROCESS_UNIT_A1),
            process_uuid_a1: self.get_string(row, COL_PROCESS_UUID_A1),
            conversion_factor_a1: self.parse_factor(row, COL_CONVERSION_FACTOR_A1, row_number),
            process_unit_a3: self.get_string(row, COL_PROCESS_UNIT_A3),
            process_uuid_a3: self.get_string(row, COL_PROCESS_UUID_A3),
            conversion_factor_a3: self.parse_factor(row, COL_CONVERSION_FACTOR_A3, row_number),
            row_number,
        })
    }

    /// 提取字符串字段（支持别名，空白 / 缺失值标记 → None）
    fn get_string(&self, row: &HashMap<String, String>, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            COL_MATERIAL_NAME => MATERIAL_NAME_ALIASES,
            _ => std::slice::from_ref(&key),
        };

        aliases.iter().find_map(|alias| {
            self.cleaner
                .normalize_null(row.get(&alias.to_lowercase()).cloned())
        })
    }

    /// 解析换算系数；非法值按缺失处理并记录警告
    fn parse_factor(
        &self,
        row: &HashMap<String, String>,
        key: &str,
        row_number: usize,
    ) -> Option<f64> {
        let raw = self.get_string(row, key)?;
        let parsed = self.cleaner.parse_optional_f64(Some(&raw));
        if parsed.is_none() {
            warn!(row = row_number, field = key, value = %raw, "换算系数无法解析，按 1.0 处理");
        }
        parsed
    }
}

fn lowercase_keys(record: HashMap<String, String>) -> HashMap<String, String> {
    record
        .into_iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .collect()
}
