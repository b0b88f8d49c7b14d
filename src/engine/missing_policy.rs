// ==========================================
// BoM 转 EPD - 缺失物料策略
// ==========================================
// 职责: 存在无 A1 UUID 的物料时，决定继续（丢弃缺失行）或中止
// 说明: 引擎层定义 trait，交互确认由应用层注入 Confirmer
// 红线: 中止 = 不写文件、不发请求
// ==========================================

use crate::domain::UnresolvedMaterial;
use crate::i18n::{t, t_with_args};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// MissingDecision
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDecision {
    /// 丢弃缺失物料后继续
    Proceed,
    /// 中止本次运行
    Abort,
}

// ==========================================
// MissingMaterialPolicy Trait
// ==========================================

/// 缺失物料策略
///
/// 仅在存在缺失物料时被调用
pub trait MissingMaterialPolicy: Send + Sync {
    /// # 参数
    /// - missing: 缺失物料（名称 + 原始数量），非空
    fn decide(&self, missing: &[UnresolvedMaterial]) -> MissingDecision;

    /// 策略名称（日志用）
    fn name(&self) -> &'static str;
}

/// 确认提示（终端 / 界面对话框）
pub trait Confirmer: Send + Sync {
    /// 返回 true 表示用户同意继续
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

// ==========================================
// 内置策略
// ==========================================

/// 自动跳过：总是继续
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoSkip;

impl MissingMaterialPolicy for AutoSkip {
    fn decide(&self, _missing: &[UnresolvedMaterial]) -> MissingDecision {
        MissingDecision::Proceed
    }

    fn name(&self) -> &'static str {
        "skip"
    }
}

/// 自动中止：只要有缺失就中止
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAbortOnMissing;

impl MissingMaterialPolicy for AutoAbortOnMissing {
    fn decide(&self, _missing: &[UnresolvedMaterial]) -> MissingDecision {
        MissingDecision::Abort
    }

    fn name(&self) -> &'static str {
        "abort"
    }
}

/// 交互确认：列出缺失物料并询问是否跳过
pub struct InteractiveConfirm<C: Confirmer> {
    confirmer: C,
}

impl<C: Confirmer> InteractiveConfirm<C> {
    pub fn new(confirmer: C) -> Self {
        Self { confirmer }
    }
}

impl<C: Confirmer> MissingMaterialPolicy for InteractiveConfirm<C> {
    fn decide(&self, missing: &[UnresolvedMaterial]) -> MissingDecision {
        let message = format!(
            "{}\n\n{}",
            format_missing_report(missing),
            t("missing.confirm_prompt")
        );
        if self.confirmer.confirm(&message) {
            MissingDecision::Proceed
        } else {
            MissingDecision::Abort
        }
    }

    fn name(&self) -> &'static str {
        "confirm"
    }
}

/// 缺失物料报告
///
/// # 格式
/// ```text
/// <标题>
///   - <名称> (<原始数量>)
/// ```
pub fn format_missing_report(missing: &[UnresolvedMaterial]) -> String {
    let mut lines = Vec::with_capacity(missing.len() + 1);
    lines.push(t("missing.header"));
    for item in missing {
        lines.push(format!("  - {} ({})", item.name, item.amount));
    }
    lines.join("\n")
}

// ==========================================
// MissingPolicyKind - 配置 / 命令行选择
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicyKind {
    Skip,
    Abort,
    Confirm,
}

impl MissingPolicyKind {
    /// 未显式配置时的选择
    ///
    /// # 规则
    /// - skip_missing = true → Skip
    /// - 交互终端 → Confirm
    /// - 其他（后台 / 管道） → Skip
    pub fn resolve_default(skip_missing: bool, interactive: bool) -> Self {
        if skip_missing {
            MissingPolicyKind::Skip
        } else if interactive {
            MissingPolicyKind::Confirm
        } else {
            MissingPolicyKind::Skip
        }
    }

    /// 构造策略对象；Confirm 需要调用方提供 Confirmer
    pub fn into_policy<C>(self, confirmer: C) -> Box<dyn MissingMaterialPolicy>
    where
        C: Confirmer + 'static,
    {
        match self {
            MissingPolicyKind::Skip => Box::new(AutoSkip),
            MissingPolicyKind::Abort => Box::new(AutoAbortOnMissing),
            MissingPolicyKind::Confirm => Box::new(InteractiveConfirm::new(confirmer)),
        }
    }
}

impl fmt::Display for MissingPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicyKind::Skip => write!(f, "skip"),
            MissingPolicyKind::Abort => write!(f, "abort"),
            MissingPolicyKind::Confirm => write!(f, "confirm"),
        }
    }
}

impl FromStr for MissingPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(MissingPolicyKind::Skip),
            "abort" => Ok(MissingPolicyKind::Abort),
            "confirm" => Ok(MissingPolicyKind::Confirm),
            other => Err(t_with_args("missing.unknown_policy", &[("value", other)])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn missing() -> Vec<UnresolvedMaterial> {
        vec![
            UnresolvedMaterial {
                name: "Wood".to_string(),
                amount: 3.0,
            },
            UnresolvedMaterial {
                name: "Paint".to_string(),
                amount: 0.25,
            },
        ]
    }

    #[test]
    fn test_auto_policies() {
        assert_eq!(AutoSkip.decide(&missing()), MissingDecision::Proceed);
        assert_eq!(AutoAbortOnMissing.decide(&missing()), MissingDecision::Abort);
    }

    #[test]
    fn test_interactive_confirm_follows_answer() {
        let asked = Arc::new(AtomicUsize::new(0));
        let counter = asked.clone();
        let policy = InteractiveConfirm::new(move |message: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(message.contains("  - Wood (3)"));
            assert!(message.contains("  - Paint (0.25)"));
            false
        });

        assert_eq!(policy.decide(&missing()), MissingDecision::Abort);
        assert_eq!(asked.load(Ordering::SeqCst), 1);

        let policy = InteractiveConfirm::new(|_: &str| true);
        assert_eq!(policy.decide(&missing()), MissingDecision::Proceed);
    }

    #[test]
    fn test_format_missing_report_lists_items() {
        let report = format_missing_report(&missing());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  - Wood (3)");
    }

    #[test]
    fn test_resolve_default() {
        assert_eq!(MissingPolicyKind::resolve_default(true, true), MissingPolicyKind::Skip);
        assert_eq!(MissingPolicyKind::resolve_default(false, true), MissingPolicyKind::Confirm);
        assert_eq!(MissingPolicyKind::resolve_default(false, false), MissingPolicyKind::Skip);
    }

    #[test]
    fn test_into_policy() {
        let policy = MissingPolicyKind::Abort.into_policy(|_: &str| true);
        assert_eq!(policy.name(), "abort");
        assert_eq!(policy.decide(&missing()), MissingDecision::Abort);

        let policy = MissingPolicyKind::Confirm.into_policy(|_: &str| true);
        assert_eq!(policy.name(), "confirm");
        assert_eq!(policy.decide(&missing()), MissingDecision::Proceed);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Skip".parse::<MissingPolicyKind>().unwrap(), MissingPolicyKind::Skip);
        assert_eq!(" confirm ".parse::<MissingPolicyKind>().unwrap(), MissingPolicyKind::Confirm);
        assert!("ignore".parse::<MissingPolicyKind>().is_err());
    }
}
