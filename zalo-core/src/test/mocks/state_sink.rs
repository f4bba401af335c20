//! # Mock State Sink
//!
//! 桥接状态接收方的 Mock 实现。

use std::sync::{Arc, Mutex};
use zalo_traits::BridgeStateSink;
use zalo_types::{BridgeState, StateEvent};

/// 状态接收方 Mock
#[derive(Debug, Clone, Default)]
pub struct MockStateSink {
    states: Arc<Mutex<Vec<BridgeState>>>,
}

impl MockStateSink {
    /// 创建新的 Mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 已上报的全部状态
    pub fn states(&self) -> Vec<BridgeState> {
        self.states.lock().unwrap().clone()
    }

    /// 已上报状态的事件序列
    pub fn events(&self) -> Vec<StateEvent> {
        self.states().into_iter().map(|s| s.state_event).collect()
    }

    /// 最近一次上报的状态
    pub fn last(&self) -> Option<BridgeState> {
        self.states.lock().unwrap().last().cloned()
    }

    /// 是否上报过指定状态
    pub fn saw(&self, event: StateEvent) -> bool {
        self.events().contains(&event)
    }
}

impl BridgeStateSink for MockStateSink {
    fn send_state(&self, state: BridgeState) {
        self.states.lock().unwrap().push(state);
    }
}
