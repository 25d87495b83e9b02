//! Image store port - where uploaded profile pictures and featured images go.

use async_trait::async_trait;

use crate::error::DomainError;

/// Upper bound for a single uploaded image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// An image received from a client, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Form field the file arrived in, used as the stored file name prefix.
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// Lowercased extension of the client-supplied file name.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    /// Both the extension and the MIME subtype must be on the allowlist, and
    /// the payload must fit under [`MAX_IMAGE_BYTES`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.data.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::validation(format!(
                "{} exceeds the 5 MB limit",
                self.field
            )));
        }

        let ext_ok = self
            .extension()
            .is_some_and(|ext| ALLOWED_TYPES.contains(&ext.as_str()));
        let mime_ok = self
            .content_type
            .to_ascii_lowercase()
            .strip_prefix("image/")
            .is_some_and(|subtype| ALLOWED_TYPES.contains(&subtype));

        if ext_ok && mime_ok {
            Ok(())
        } else {
            Err(DomainError::validation("Only image files are allowed"))
        }
    }
}

/// Persists validated images and hands back the URL clients should use.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, image: UploadedImage) -> Result<String, DomainError>;
}
