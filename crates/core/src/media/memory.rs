use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{MediaError, MediaHost, MediaResult, PendingUpload, UploadedAsset};

/// In-process media host for tests and local runs without Cloudinary.
///
/// Uploads get deterministic ids (`asset-1`, `asset-2`, ...). Every
/// destroy call is recorded, whether or not it is made to fail.
#[derive(Debug, Default)]
pub struct MemoryMediaHost {
    next_id: AtomicU64,
    fail_uploads: AtomicBool,
    fail_destroys: AtomicBool,
    uploaded: Mutex<Vec<UploadedAsset>>,
    destroyed: Mutex<Vec<String>>,
}

impl MemoryMediaHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose destroy calls always fail.
    pub fn failing_destroy() -> Self {
        let host = Self::default();
        host.fail_destroys.store(true, Ordering::SeqCst);
        host
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_destroys(&self, fail: bool) {
        self.fail_destroys.store(fail, Ordering::SeqCst);
    }

    pub async fn uploaded(&self) -> Vec<UploadedAsset> {
        self.uploaded.lock().await.clone()
    }

    /// Public ids passed to `destroy`, in call order.
    pub async fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().await.clone()
    }
}

#[async_trait]
impl MediaHost for MemoryMediaHost {
    async fn upload(&self, upload: PendingUpload) -> MediaResult<UploadedAsset> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Unavailable("uploads disabled".into()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let ext = upload
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("bin");
        let asset = UploadedAsset {
            url: format!("https://media.local/image/upload/v1/asset-{n}.{ext}"),
            public_id: format!("asset-{n}"),
        };
        self.uploaded.lock().await.push(asset.clone());
        Ok(asset)
    }

    async fn destroy(&self, public_id: &str) -> MediaResult<()> {
        self.destroyed.lock().await.push(public_id.to_string());
        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(MediaError::Unavailable("destroy disabled".into()));
        }
        Ok(())
    }
}
