//! # Mock Media Store
//!
//! 内存媒体仓库，上传返回 `mxc://mock/<n>`。

use super::MockCallTracker;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zalo_traits::{BoxError, MediaStore};

/// 上传记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub data: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

/// 媒体仓库 Mock
#[derive(Debug, Clone, Default)]
pub struct MockMediaStore {
    tracker: MockCallTracker,
    objects: Arc<Mutex<HashMap<String, StoredMedia>>>,
    fail_uploads: Arc<Mutex<Option<String>>>,
    fail_downloads: Arc<Mutex<Option<String>>>,
}

impl MockMediaStore {
    /// 创建新的 Mock
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置可下载的内容
    pub fn insert(&self, uri: impl Into<String>, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            uri.into(),
            StoredMedia {
                data,
                file_name: String::new(),
                mime_type: String::new(),
            },
        );
    }

    /// 之后的上传全部失败
    pub fn fail_uploads(&self, reason: impl Into<String>) {
        *self.fail_uploads.lock().unwrap() = Some(reason.into());
    }

    /// 之后的下载全部失败
    pub fn fail_downloads(&self, reason: impl Into<String>) {
        *self.fail_downloads.lock().unwrap() = Some(reason.into());
    }

    /// 按 URI 查询已存储的内容
    pub fn get(&self, uri: &str) -> Option<StoredMedia> {
        self.objects.lock().unwrap().get(uri).cloned()
    }

    /// 获取调用追踪器
    pub fn tracker(&self) -> &MockCallTracker {
        &self.tracker
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(&self, data: Vec<u8>, file_name: &str, mime_type: &str) -> Result<String, BoxError> {
        self.tracker
            .record("upload", vec![file_name.to_string(), mime_type.to_string()]);

        let failure = self.fail_uploads.lock().unwrap().clone();
        if let Some(reason) = failure {
            return Err(reason.into());
        }

        let mut objects = self.objects.lock().unwrap();
        let uri = format!("mxc://mock/{}", objects.len() + 1);
        objects.insert(
            uri.clone(),
            StoredMedia {
                data,
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
            },
        );
        Ok(uri)
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, BoxError> {
        self.tracker.record("download", vec![uri.to_string()]);

        let failure = self.fail_downloads.lock().unwrap().clone();
        if let Some(reason) = failure {
            return Err(reason.into());
        }

        self.objects
            .lock()
            .unwrap()
            .get(uri)
            .map(|m| m.data.clone())
            .ok_or_else(|| format!("no media at {}", uri).into())
    }
}
