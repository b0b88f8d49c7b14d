// ==========================================
// BoM 转 EPD - 导入层
// ==========================================
// 职责: 外部表格读取,生成物料行与映射条目
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod row_extractor;
pub mod sources;

// 重导出核心类型
pub use data_cleaner::{column_index_to_letter, is_na_token, parse_column_ref, DataCleaner};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use row_extractor::{RowExtractor, FINAL_PRODUCT_LABEL, TOTAL_NET_LABEL};
pub use sources::{FileBomSource, FileMappingSource};

// 重导出 Trait 接口
pub use importer_trait::{BomSource, FileParser, MappingSource};
