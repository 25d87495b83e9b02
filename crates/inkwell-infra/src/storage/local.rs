use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::error::DomainError;
use inkwell_core::ports::{ImageStore, UploadedImage};

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Writes uploads into a directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if needed.
    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Resolve a public file name to its path on disk. Names that could
    /// escape the upload directory resolve to `None`.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        let safe = !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && !file_name.contains("..");
        safe.then(|| self.root.join(file_name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, image: UploadedImage) -> Result<String, DomainError> {
        image.validate()?;

        let ext = image.extension().unwrap_or_else(|| "img".to_string());
        let file_name = format!(
            "{}-{}-{}.{}",
            image.field,
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            ext
        );

        let path = self.root.join(&file_name);
        tokio::fs::write(&path, &image.data).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to write upload");
            DomainError::Internal(format!("could not store {}: {e}", image.field))
        })?;

        tracing::debug!(file = %file_name, bytes = image.data.len(), "Stored upload");
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }
}
