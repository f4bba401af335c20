//! Media helpers: fetching remote media, content sniffing and temp-file
//! staging for outbound uploads.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};

const TEMP_FILE_PREFIX: &str = "zalo-bridge-";

/// Downloads media referenced by inbound remote messages.
#[derive(Debug, Clone)]
pub struct MediaFetcher {
    http: Client,
}

impl MediaFetcher {
    pub fn new(timeout: Duration) -> BridgeResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BridgeError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Fetches `url`; anything but a 2xx answer is a [`BridgeError::MediaFetch`].
    pub async fn fetch(&self, url: &str) -> BridgeResult<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BridgeError::media_fetch(format!("download {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BridgeError::media_fetch(format!(
                "download {} failed with status {}",
                url,
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BridgeError::media_fetch(format!("read {}: {}", url, e)))?;
        debug!(url, size = bytes.len(), "Fetched remote media");
        Ok(bytes.to_vec())
    }
}

/// Sniffs the content type from leading magic bytes.
pub fn detect_mime(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        [b'B', b'M', ..] => "image/bmp",
        [0x00, 0x00, 0x01, 0x00, ..] => "image/x-icon",
        [b'%', b'P', b'D', b'F', b'-', ..] => "application/pdf",
        [0x1A, 0x45, 0xDF, 0xA3, ..] => "video/webm",
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => "video/mp4",
        _ => "application/octet-stream",
    }
}

/// File extension matching a sniffed content type.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/x-icon" => "ico",
        "application/pdf" => "pdf",
        "video/webm" => "webm",
        "video/mp4" => "mp4",
        _ => "bin",
    }
}

/// A scoped temporary file. The file is removed when this value is dropped,
/// on every exit path.
#[derive(Debug)]
pub struct TempMedia {
    file: NamedTempFile,
}

impl TempMedia {
    /// Writes `data` to a new temp file under `dir`.
    pub fn write(dir: &Path, data: &[u8]) -> BridgeResult<Self> {
        let suffix = format!(".{}", extension_for(detect_mime(data)));
        let mut file = Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(|e| BridgeError::io(format!("create temp file in {}: {}", dir.display(), e)))?;

        file.write_all(data)
            .and_then(|_| file.flush())
            .map_err(|e| BridgeError::io(format!("write temp file: {}", e)))?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }
}
