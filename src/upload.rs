use crate::error::{AppError, Result};
use crate::model::{FileHandle, TrainingBackend};
use std::path::Path;
use tracing::info;

pub const DEFAULT_PURPOSE: &str = "fine-tune";

/// Sends the file at `path` to remote storage and returns its handle.
pub async fn upload_dataset<B: TrainingBackend + ?Sized>(
    backend: &B,
    path: impl AsRef<Path>,
    purpose: &str,
) -> Result<FileHandle> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| AppError::from_io(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.jsonl".to_string());
    let handle = backend.upload_file(&file_name, bytes, purpose).await?;
    info!(path = %path.display(), file_id = %handle, purpose, "uploaded dataset");
    Ok(handle)
}
