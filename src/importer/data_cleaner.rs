// ==========================================
// BoM 转 EPD - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数量解析 / 列引用解析
// 红线: 数量解析永不报错，失败一律降级为 0.0
// ==========================================

/// 表格中的缺失值标记（与 pandas 默认 na_values 一致，区分大小写）
///
/// Excel 错误单元格（如 VLOOKUP 未命中的 `#N/A`）经 calamine 读出后也落在此集合内
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 已 TRIM 的单元格文本是否表示缺失值
pub fn is_na_token(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("nan") || NA_TOKENS.contains(&value)
}

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 空白 / 缺失值标记 → None，其余 TRIM
    pub fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if is_na_token(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析数量单元格
    ///
    /// # 规则
    /// - 小数逗号视为小数点（"12,5" ≡ "12.5"）
    /// - 无法解析 / 非有限值 → 0.0
    pub fn parse_amount(&self, raw: &str) -> f64 {
        let normalized = raw.trim().replace(',', ".");
        match normalized.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => 0.0,
        }
    }

    /// 解析可选数值（换算系数等），空白或非法 → None
    pub fn parse_optional_f64(&self, raw: Option<&str>) -> Option<f64> {
        let value = raw?.trim();
        if is_na_token(value) {
            return None;
        }
        value
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 物料名是否视为空（空串或缺失值标记）
    pub fn is_blank_material(&self, name: &str) -> bool {
        is_na_token(name.trim())
    }
}

/// 列引用解析：字母（A, B, ..., Z, AA, ...）或数字下标（0 起）
///
/// # 示例
/// - "A" → 0, "C" → 2, "AA" → 26
/// - "4" → 4
/// - "" / "A1" / "-" → None
pub fn parse_column_ref(value: &str) -> Option<usize> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed.parse::<usize>().ok();
    }

    if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut index: usize = 0;
    for c in trimmed.to_ascii_uppercase().chars() {
        let digit = (c as u8 - b'A' + 1) as usize;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// 列下标 → 字母（0 → "A"）
pub fn column_index_to_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_decimal_comma() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_amount("12,5"), 12.5);
        assert_eq!(cleaner.parse_amount("12.5"), 12.5);
        assert_eq!(cleaner.parse_amount(" 3 "), 3.0);
    }

    #[test]
    fn test_parse_amount_degrades_to_zero() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_amount(""), 0.0);
        assert_eq!(cleaner.parse_amount("abc"), 0.0);
        assert_eq!(cleaner.parse_amount("1.234,5"), 0.0);
        assert_eq!(cleaner.parse_amount("nan"), 0.0);
        assert_eq!(cleaner.parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_parse_optional_f64() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_optional_f64(Some("0,5")), Some(0.5));
        assert_eq!(cleaner.parse_optional_f64(Some("  ")), None);
        assert_eq!(cleaner.parse_optional_f64(Some("NaN")), None);
        assert_eq!(cleaner.parse_optional_f64(Some("x")), None);
        assert_eq!(cleaner.parse_optional_f64(None), None);
    }

    #[test]
    fn test_is_blank_material() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_blank_material(""));
        assert!(cleaner.is_blank_material("   "));
        assert!(cleaner.is_blank_material("nan"));
        assert!(cleaner.is_blank_material("NaN"));
        assert!(!cleaner.is_blank_material("Steel"));
    }

    #[test]
    fn test_na_markers_are_blank() {
        let cleaner = DataCleaner;
        for marker in ["#N/A", "N/A", "NA", "NULL", "null", "None", "n/a", "<NA>", "-nan", " #N/A "] {
            assert!(cleaner.is_blank_material(marker), "{marker}");
            assert_eq!(cleaner.normalize_null(Some(marker.to_string())), None, "{marker}");
        }
        assert_eq!(cleaner.parse_optional_f64(Some("#N/A")), None);
        // 仅精确匹配；含标记的正常名称保留
        assert!(!cleaner.is_blank_material("NA-Steel"));
        assert!(!cleaner.is_blank_material("none"));
        assert!(!cleaner.is_blank_material("Nylon"));
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_column_ref() {
        assert_eq!(parse_column_ref("A"), Some(0));
        assert_eq!(parse_column_ref("c"), Some(2));
        assert_eq!(parse_column_ref("Z"), Some(25));
        assert_eq!(parse_column_ref("AA"), Some(26));
        assert_eq!(parse_column_ref("AB"), Some(27));
        assert_eq!(parse_column_ref("4"), Some(4));
        assert_eq!(parse_column_ref(""), None);
        assert_eq!(parse_column_ref("A1"), None);
        assert_eq!(parse_column_ref("-"), None);
    }

    #[test]
    fn test_column_index_to_letter() {
        assert_eq!(column_index_to_letter(0), "A");
        assert_eq!(column_index_to_letter(25), "Z");
        assert_eq!(column_index_to_letter(26), "AA");
        for idx in [0, 4, 27, 700] {
            assert_eq!(parse_column_ref(&column_index_to_letter(idx)), Some(idx));
        }
    }
}
