//! # Mock Event Sink
//!
//! 远端事件接收方的 Mock 实现，按接收顺序记录事件。

use super::MockCallTracker;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zalo_traits::{BoxError, RemoteEventSink};
use zalo_types::RemoteEvent;

/// 事件接收方 Mock
#[derive(Debug, Clone, Default)]
pub struct MockEventSink {
    tracker: MockCallTracker,
    events: Arc<Mutex<Vec<RemoteEvent>>>,
    reject_with: Arc<Mutex<Option<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockEventSink {
    /// 创建新的 Mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次接收前等待指定时长，模拟处理缓慢的宿主
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    /// 之后的事件全部拒收
    pub fn reject(&self, reason: impl Into<String>) {
        *self.reject_with.lock().unwrap() = Some(reason.into());
    }

    /// 已接收的事件
    pub fn events(&self) -> Vec<RemoteEvent> {
        self.events.lock().unwrap().clone()
    }

    /// 获取调用追踪器
    pub fn tracker(&self) -> &MockCallTracker {
        &self.tracker
    }
}

#[async_trait]
impl RemoteEventSink for MockEventSink {
    async fn queue_remote_event(&self, event: RemoteEvent) -> Result<(), BoxError> {
        self.tracker
            .record("queue_remote_event", vec![event.portal().to_string()]);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let rejected = self.reject_with.lock().unwrap().clone();
        if let Some(reason) = rejected {
            return Err(reason.into());
        }

        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
