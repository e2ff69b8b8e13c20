use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::{MediaError, MediaHost, MediaResult, PendingUpload, UploadedAsset};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder new uploads are placed in, if any.
    pub folder: Option<String>,
    pub api_base: String,
}

/// Signed client for Cloudinary's upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    async fn rejection(resp: reqwest::Response) -> MediaError {
        let status = resp.status();
        match resp.json::<ErrorResponse>().await {
            Ok(body) => MediaError::Rejected(body.error.message),
            Err(_) => MediaError::Rejected(format!("HTTP {status}")),
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryClient {
    async fn upload(&self, upload: PendingUpload) -> MediaResult<UploadedAsset> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let mut params: Vec<(&str, &str)> = vec![("timestamp", timestamp.as_str())];
        if let Some(folder) = self.config.folder.as_deref() {
            params.push(("folder", folder));
        }
        let signature = sign(&params, &self.config.api_secret);

        let mut file = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }

        let resp = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        let body: UploadResponse = resp.json().await?;
        tracing::debug!(public_id = %body.public_id, "uploaded media asset");
        Ok(UploadedAsset {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> MediaResult<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let params = [("public_id", public_id), ("timestamp", timestamp.as_str())];
        let signature = sign(&params, &self.config.api_secret);

        let resp = self
            .http
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", "sha256"),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }
        let body: DestroyResponse = resp.json().await?;
        match body.result.as_str() {
            "ok" => Ok(()),
            other => Err(MediaError::Rejected(format!(
                "destroy {public_id}: {other}"
            ))),
        }
    }
}

/// Request signature: parameters sorted by name, joined as `k=v&k=v`,
/// followed by the API secret, hashed with SHA-256.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
