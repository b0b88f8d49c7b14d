// ==========================================
// BoM 转 EPD - 终端交互
// ==========================================
// 职责: 缺失物料确认提示（stdin / stderr）
// ==========================================

use crate::engine::Confirmer;
use std::io::{BufRead, IsTerminal, Write};

/// 标准输入是否为交互终端
pub fn stdin_is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// 肯定回答判定（大小写不敏感）
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "j" | "ja" | "是" | "好"
    )
}

/// 终端确认：提示写到 stderr，回答从 stdin 读取一行
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr();
        // 提示写失败时仍尝试读取回答
        let _ = write!(stderr, "{message}");
        let _ = stderr.flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}
