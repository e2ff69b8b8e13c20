use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use portfolio_core::media::PendingUpload;

use crate::error::{ApiError, ApiResult};

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// A parsed multipart form: at most one image plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub image: Option<PendingUpload>,
    fields: HashMap<String, String>,
}

impl<S: Send + Sync> FromRequest<S> for UploadForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::read(multipart).await
    }
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                if let Some(ct) = content_type.as_deref() {
                    if !ct.starts_with("image/") {
                        return Err(ApiError::BadRequest(format!(
                            "{IMAGE_FIELD} must be an image, got {ct}"
                        )));
                    }
                }
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    form.image = Some(PendingUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }
        Ok(form)
    }

    /// A text field with surrounding whitespace removed; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn take_image(&mut self) -> ApiResult<PendingUpload> {
        self.image
            .take()
            .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))
    }
}
