//! # Mock Implementations
//!
//! 可验证的 Mock 实现，用于单元测试中隔离宿主侧依赖。
//!
//! ## 核心特性
//!
//! - **调用追踪**: 自动记录所有方法调用
//! - **行为配置**: 预设失败或延迟
//! - **并发安全**: 使用内部锁保证线程安全
//!
//! ## Mock 列表
//!
//! | Mock | 用途 | 关键能力 |
//! |------|------|----------|
//! | `MockEventSink` | 远端事件接收 | 事件记录、拒收、处理延迟 |
//! | `MockStateSink` | 桥接状态接收 | 状态序列记录 |
//! | `MockMediaStore` | 媒体仓库 | 内存存储、上传/下载失败 |
//!
//! ## 使用模式
//!
//! ```rust,ignore
//! let media = MockMediaStore::new();
//! media.fail_downloads("offline");
//! // ...
//! media.tracker().assert_call_count("download", 1);
//! ```

pub mod event_sink;
pub mod media_store;
pub mod state_sink;

pub use event_sink::MockEventSink;
pub use media_store::MockMediaStore;
pub use state_sink::MockStateSink;

use std::sync::{Arc, Mutex};

/// 调用记录
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// 方法名
    pub method: String,
    /// 参数列表（序列化后）
    pub args: Vec<String>,
    /// 调用时间
    pub timestamp: std::time::Instant,
}

impl CallRecord {
    pub fn new(method: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            method: method.into(),
            args,
            timestamp: std::time::Instant::now(),
        }
    }
}

/// Mock 调用追踪器
#[derive(Debug, Default, Clone)]
pub struct MockCallTracker {
    calls: Arc<Mutex<Vec<CallRecord>>>,
}

impl MockCallTracker {
    /// 创建新的追踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录调用
    pub fn record(&self, method: impl Into<String>, args: Vec<String>) {
        self.calls.lock().unwrap().push(CallRecord::new(method, args));
    }

    /// 获取指定方法的调用记录
    pub fn get_calls_for(&self, method: &str) -> Vec<CallRecord> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// 获取调用次数
    pub fn call_count(&self, method: &str) -> usize {
        self.get_calls_for(method).len()
    }

    /// 断言：方法被调用指定次数
    pub fn assert_call_count(&self, method: &str, expected: usize) {
        let actual = self.call_count(method);
        assert_eq!(
            actual, expected,
            "Expected method '{}' to be called {} times, but was called {} times",
            method, expected, actual
        );
    }

    /// 断言：方法至少被调用一次
    pub fn assert_called(&self, method: &str) {
        let count = self.call_count(method);
        assert!(
            count > 0,
            "Expected method '{}' to be called at least once, but was never called",
            method
        );
    }

    /// 断言：方法从未被调用
    pub fn assert_not_called(&self, method: &str) {
        let count = self.call_count(method);
        assert_eq!(
            count, 0,
            "Expected method '{}' to never be called, but was called {} times",
            method, count
        );
    }

    /// 断言：最后一次调用的参数
    pub fn assert_last_call_args(&self, method: &str, expected_args: Vec<&str>) {
        let calls = self.get_calls_for(method);
        let last_call = calls
            .last()
            .unwrap_or_else(|| panic!("Expected method '{}' to have been called", method));

        let expected: Vec<String> = expected_args.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            last_call.args, expected,
            "Method '{}' was called with unexpected arguments",
            method
        );
    }

    /// 清空调用记录
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts_by_method() {
        let tracker = MockCallTracker::new();
        tracker.record("upload", vec!["a.png".into()]);
        tracker.record("upload", vec!["b.png".into()]);
        tracker.record("download", vec![]);

        tracker.assert_call_count("upload", 2);
        tracker.assert_called("download");
        tracker.assert_not_called("delete");
        tracker.assert_last_call_args("upload", vec!["b.png"]);

        tracker.clear();
        tracker.assert_not_called("upload");
    }
}
