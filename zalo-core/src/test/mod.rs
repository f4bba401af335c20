//! # Zalo Bridge Test Framework
//!
//! 测试框架，提供宿主侧协作者的 Mock 实现和测试工具。
//!
//! ## 模块结构
//!
//! - `mocks`: Mock 实现，用于隔离测试
//!   - `MockEventSink`: 远端事件接收方 Mock
//!   - `MockStateSink`: 桥接状态接收方 Mock
//!   - `MockMediaStore`: 媒体仓库 Mock
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use zalo_core::test::mocks::{MockEventSink, MockMediaStore, MockStateSink};
//!
//! # async fn example() {
//! let events = MockEventSink::new();
//! let media = MockMediaStore::new();
//! media.insert("mxc://local/cat", b"png bytes".to_vec());
//!
//! // 执行测试
//! // ...
//!
//! // 验证调用
//! media.tracker().assert_call_count("download", 1);
//! assert!(events.events().is_empty());
//! # }
//! ```

pub mod mocks;

/// 测试工具函数
pub mod utils {
    use std::time::Duration;
    use tokio::time::{sleep, timeout, Instant};

    /// 带超时的异步测试包装器
    pub async fn with_timeout<T, F>(duration: Duration, f: F) -> Result<T, String>
    where
        F: std::future::Future<Output = T>,
    {
        timeout(duration, f)
            .await
            .map_err(|_| format!("Test timed out after {:?}", duration))
    }

    /// 默认测试超时（5秒）
    pub async fn with_default_timeout<T, F>(f: F) -> Result<T, String>
    where
        F: std::future::Future<Output = T>,
    {
        with_timeout(Duration::from_secs(5), f).await
    }

    /// 轮询直到条件成立或超时，返回条件是否成立
    pub async fn wait_until<F>(duration: Duration, mut condition: F) -> bool
    where
        F: FnMut() -> bool,
    {
        let deadline = Instant::now() + duration;
        loop {
            if condition() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(Duration::from_millis(10)).await;
        }
    }
}
