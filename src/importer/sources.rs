// ==========================================
// BoM 转 EPD - 文件数据源
// ==========================================
// 职责: 将文件解析器包装为管道可用的 BomSource / MappingSource
// ==========================================

use crate::domain::{MappingEntry, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::{BomSource, FileParser, MappingSource};
use std::path::PathBuf;
use tracing::{debug, info};

// ==========================================
// FileBomSource - BoM 表格文件
// ==========================================
pub struct FileBomSource {
    path: PathBuf,
    sheet: Option<String>,
    parser: Box<dyn FileParser>,
}

impl FileBomSource {
    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>, csv_delimiter: u8) -> Self {
        Self {
            path: path.into(),
            sheet,
            parser: Box::new(UniversalFileParser::new(csv_delimiter)),
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn FileParser>) -> Self {
        self.parser = parser;
        self
    }
}

impl BomSource for FileBomSource {
    fn read_rows(&self) -> ImportResult<Vec<RawRow>> {
        debug!(path = %self.path.display(), sheet = ?self.sheet, "读取 BoM 文件");
        let rows = self.parser.parse_rows(&self.path, self.sheet.as_deref())?;
        info!(path = %self.path.display(), rows = rows.len(), "BoM 文件解析完成");
        Ok(rows)
    }

    fn describe(&self) -> String {
        match &self.sheet {
            Some(sheet) if !sheet.trim().is_empty() => {
                format!("{} [{}]", self.path.display(), sheet)
            }
            _ => self.path.display().to_string(),
        }
    }
}

// ==========================================
// FileMappingSource - 映射表文件
// ==========================================
pub struct FileMappingSource {
    path: PathBuf,
    parser: Box<dyn FileParser>,
    mapper: FieldMapper,
}

impl FileMappingSource {
    pub fn new(path: impl Into<PathBuf>, csv_delimiter: u8) -> Self {
        Self {
            path: path.into(),
            parser: Box::new(UniversalFileParser::new(csv_delimiter)),
            mapper: FieldMapper::default(),
        }
    }
}

impl MappingSource for FileMappingSource {
    fn load_entries(&self) -> ImportResult<Vec<MappingEntry>> {
        debug!(path = %self.path.display(), "读取映射表");
        let records = self.parser.parse_records(&self.path)?;
        let entries = self.mapper.map_records(records)?;
        info!(path = %self.path.display(), entries = entries.len(), "映射表加载完成");
        Ok(entries)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
