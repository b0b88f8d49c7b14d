// ==========================================
// BoM 转 EPD - 界面文案
// ==========================================
// 职责: 进度 / 提示 / 结果摘要的多语言文案
// 语言: zh-CN（默认，兜底）/ en
// 说明: rust_i18n::i18n! 宏在 lib.rs 中初始化，文案见 locales/*.yml
// ==========================================

use tracing::warn;

/// 默认语言（未知语言的兜底）
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// 已提供文案的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 语言代码规范化
///
/// # 规则
/// - 大小写与 `_` / `-` 不敏感，地区后缀忽略（"en_US" → "en"，"zh-Hans" → "zh-CN"）
/// - 无法识别 → None
pub fn normalize_locale(locale: &str) -> Option<&'static str> {
    let lower = locale.trim().to_lowercase().replace('_', "-");
    let language = lower.split('-').next().unwrap_or("");
    match language {
        "zh" => Some("zh-CN"),
        "en" => Some("en"),
        _ => None,
    }
}

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换界面语言，返回实际生效的语言
///
/// 无法识别的语言记录警告并回落到 zh-CN
pub fn set_locale(locale: &str) -> &'static str {
    let applied = normalize_locale(locale).unwrap_or_else(|| {
        warn!(requested = %locale, fallback = DEFAULT_LOCALE, "不支持的界面语言");
        DEFAULT_LOCALE
    });
    rust_i18n::set_locale(applied);
    applied
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 带 `%{name}` 占位符的文案；未提供的占位符原样保留
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |text, (name, value)| {
        text.replace(&format!("%{{{name}}}"), value)
    })
}
