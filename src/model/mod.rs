use crate::error::Result;


/// Turn boundaries the model must not write past.
pub const TURN_STOP_SEQUENCES: [&str; 3] = ["\n", "Human:", "AI:"];

pub const DEFAULT_MAX_TOKENS: u32 = 150;


#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
pub prompt: String,
pub max_tokens: u32,
pub stop: Vec<String>,
}

impl CompletionRequest {
pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
Self { prompt: prompt.into(), max_tokens, stop: Vec::new() }
}

pub fn stop_at_turn_boundary(mut self) -> Self {
self.stop = TURN_STOP_SEQUENCES.iter().map(|s| s.to_string()).collect();
self
}
}


/// Opaque id of a file held by the remote storage API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHandle(pub String);

/// Opaque id of a remote fine-tuning job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FineTuneJobHandle(pub String);

impl std::fmt::Display for FileHandle {
fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

impl std::fmt::Display for FineTuneJobHandle {
fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}


#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync + 'static {
/// Returns the raw text of the first completion choice.
async fn complete(&self, req: &CompletionRequest) -> Result<String>;
}


#[async_trait::async_trait]
pub trait TrainingBackend: Send + Sync + 'static {
async fn upload_file(&self, file_name: &str, bytes: Vec<u8>, purpose: &str) -> Result<FileHandle>;
async fn create_fine_tune(&self, training_file: &FileHandle, model: &str) -> Result<FineTuneJobHandle>;
}


pub mod openai;
