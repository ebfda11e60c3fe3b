//! services/dashboard/src/adapters/local_file.rs
//!
//! Turns a file on disk into the `UploadFile` a file picker would hand over.

use bytes::Bytes;
use smartdoc_core::domain::{FileType, UploadFile};
use std::path::Path;
use tracing::warn;

use crate::error::DashboardError;

/// The declared type comes from the extension, empty when it is not one we
/// know. Files over `max_bytes` are not read; the upload flow refuses them
/// by their size alone.
pub async fn read_upload(path: &Path, max_bytes: u64) -> Result<UploadFile, DashboardError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| DashboardError::Internal(format!("Not a file: {}", path.display())))?;
    let declared_type = path
        .extension()
        .and_then(|ext| FileType::from_extension(&ext.to_string_lossy()))
        .map(|t| t.mime().to_string())
        .unwrap_or_default();

    let size = tokio::fs::metadata(path).await?.len();
    if size > max_bytes {
        warn!("{} is {} bytes, not reading it", path.display(), size);
        return Ok(UploadFile {
            name,
            declared_type,
            size,
            contents: Bytes::new(),
        });
    }

    let contents = tokio::fs::read(path).await?;
    Ok(UploadFile::new(name, declared_type, Bytes::from(contents)))
}
