// ==========================================
// BoM 转 EPD - 进度通知
// ==========================================
// 职责: 定义面向用户的进度消息出口
// 说明: 可能在后台线程中被调用，实现方负责切回界面线程
// ==========================================

use tracing::info;

/// 进度消息接收者
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// 丢弃所有消息
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _message: &str) {}
}

/// 以 info 级别写入日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, message: &str) {
        info!(target: "bom_to_epd::progress", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink() {
        let messages = Mutex::new(Vec::new());
        let sink = |message: &str| messages.lock().unwrap().push(message.to_string());
        sink.report("first");
        sink.report("second");
        assert_eq!(*messages.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_builtin_sinks_accept_messages() {
        NullSink.report("ignored");
        TracingSink.report("logged");
    }
}
