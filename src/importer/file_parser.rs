// ==========================================
// BoM 转 EPD - 文件解析器实现
// ==========================================
// 职责: 表格文件 → 原始行 / 表头记录
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// ==========================================

use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 行记录：表头 → 值，跳过完全空白的行
fn rows_to_records(rows: Vec<RawRow>) -> ImportResult<Vec<HashMap<String, String>>> {
    let mut iter = rows.into_iter();
    let headers: Vec<String> = iter
        .next()
        .ok_or_else(|| ImportError::ExcelParseError("文件无表头行".to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in iter {
        let mut row_map = HashMap::new();
        for (col_idx, value) in row.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok(records)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn read_all(&self, path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(path)?;

        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Ok(rows)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for CsvParser {
    fn parse_rows(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<Vec<RawRow>> {
        self.read_all(file_path)
    }

    fn parse_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        rows_to_records(self.read_all(file_path)?)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn read_range(&self, path: &Path, sheet: Option<&str>) -> ImportResult<Range<Data>> {
        ensure_exists(path)?;

        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError("Excel 文件无工作表".to_string()));
        }

        // 未指定工作表时读取第一个
        let sheet_name = match sheet.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => {
                if !sheet_names.iter().any(|n| n == name) {
                    return Err(ImportError::SheetNotFound {
                        sheet: name.to_string(),
                        available: sheet_names.join(", "),
                    });
                }
                name.to_string()
            }
            None => sheet_names[0].clone(),
        };

        Ok(workbook.worksheet_range(&sheet_name)?)
    }
}

/// Range → 原始行
///
/// calamine 的 Range 从第一个非空单元格开始，这里按绝对位置
/// (0, 0) 起展开，保证行偏移与列下标与表格软件一致。
fn range_to_rows(range: &Range<Data>) -> Vec<RawRow> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|r| {
            (0..=end_col)
                .map(|c| {
                    range
                        .get_value((r, c))
                        .map(cell_to_string)
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

impl FileParser for ExcelParser {
    fn parse_rows(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Vec<RawRow>> {
        let range = self.read_range(file_path, sheet)?;
        Ok(range_to_rows(&range))
    }

    fn parse_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        let range = self.read_range(file_path, None)?;
        // 表头为 Range 的第一行（不要求从 A1 开始）
        let rows: Vec<RawRow> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        rows_to_records(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    csv: CsvParser,
    excel: ExcelParser,
}

impl UniversalFileParser {
    pub fn new(csv_delimiter: u8) -> Self {
        Self {
            csv: CsvParser::new(csv_delimiter),
            excel: ExcelParser,
        }
    }

    fn select(&self, path: &Path) -> ImportResult<&dyn FileParser> {
        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => Ok(&self.csv as &dyn FileParser),
            e if EXCEL_EXTENSIONS.contains(&e) => Ok(&self.excel as &dyn FileParser),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for UniversalFileParser {
    fn parse_rows(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<Vec<RawRow>> {
        self.select(file_path)?.parse_rows(file_path, sheet)
    }

    fn parse_records(&self, file_path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        self.select(file_path)?.parse_records(file_path)
    }
}
