use crate::error::{AppError, Result};
use crate::model::{FileHandle, FineTuneJobHandle, TrainingBackend};
use tracing::info;

pub const DEFAULT_BASE_MODEL: &str = "davinci";

/// Requests a fine-tuning job over a previously uploaded training file.
pub async fn submit_fine_tune<B: TrainingBackend + ?Sized>(
    backend: &B,
    training_file: &FileHandle,
    base_model: &str,
) -> Result<FineTuneJobHandle> {
    if training_file.0.trim().is_empty() {
        return Err(AppError::Validation("training file id is required".to_string()));
    }
    if base_model.trim().is_empty() {
        return Err(AppError::Validation("base model is required".to_string()));
    }
    let job = backend.create_fine_tune(training_file, base_model).await?;
    info!(training_file = %training_file, base_model, job_id = %job, "fine-tune job created");
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Jobs;

    #[async_trait::async_trait]
    impl TrainingBackend for Jobs {
        async fn upload_file(&self, _: &str, _: Vec<u8>, _: &str) -> Result<FileHandle> {
            unreachable!()
        }

        async fn create_fine_tune(&self, training_file: &FileHandle, model: &str) -> Result<FineTuneJobHandle> {
            match training_file.0.as_str() {
                "file-missing" => Err(AppError::RemoteService(
                    "404: No such File object: file-missing".into(),
                )),
                id => Ok(FineTuneJobHandle(format!("ftjob-{id}-{model}"))),
            }
        }
    }

    #[tokio::test]
    async fn returns_job_handle() {
        let job = submit_fine_tune(&Jobs, &FileHandle("file-1".into()), DEFAULT_BASE_MODEL).await.unwrap();
        assert_eq!(job.to_string(), "ftjob-file-1-davinci");
    }

    #[tokio::test]
    async fn empty_inputs_are_validation_errors() {
        let err = submit_fine_tune(&Jobs, &FileHandle(String::new()), "davinci").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = submit_fine_tune(&Jobs, &FileHandle("file-1".into()), " ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn upstream_detail_is_preserved() {
        let err = submit_fine_tune(&Jobs, &FileHandle("file-missing".into()), "davinci").await.unwrap_err();
        assert_eq!(err.to_string(), "404: No such File object: file-missing");
    }
}
