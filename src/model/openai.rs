//! HTTP client for an OpenAI-style API: text completions, file storage and
//! fine-tuning jobs.

use super::{CompletionBackend, CompletionRequest, FileHandle, FineTuneJobHandle, TrainingBackend};
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_COMPLETION_MODEL: &str = "text-davinci-003";

struct Inner {
    http: Client,
    base: String,
    api_key: String,
    model: String,
}

#[derive(Clone)]
pub struct OpenAiBackend {
    inner: Arc<Inner>,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "no_stops")]
    stop: &'a [String],
}

fn no_stops(stop: &&[String]) -> bool {
    stop.is_empty()
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

#[derive(Serialize)]
struct FineTuneBody<'a> {
    training_file: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiBackend {
    /// Builds a client from validated API settings. Fails on a placeholder key.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        api.validate()?;
        let http = Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| AppError::Config(format!("build http client: {e}")))?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base: api.api_base.trim_end_matches('/').to_string(),
                api_key: api.api_key.trim().to_string(),
                model: DEFAULT_COMPLETION_MODEL.to_string(),
            }),
        })
    }

    /// Model (base or fine-tuned id) used for completions.
    pub fn with_completion_model(self, model: impl Into<String>) -> Self {
        let inner = &self.inner;
        Self {
            inner: Arc::new(Inner {
                http: inner.http.clone(),
                base: inner.base.clone(),
                api_key: inner.api_key.clone(),
                model: model.into(),
            }),
        }
    }

    pub fn completion_model(&self) -> &str {
        &self.inner.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base, path)
    }

    /// Turns a non-2xx reply into `RemoteService` with the provider's message.
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Err(AppError::RemoteService(format!("{}: {}", status.as_u16(), message.trim())))
    }
}

fn observe<T>(op: &'static str, started: Instant, result: &Result<T>) {
    let outcome = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!("remote_requests_total", "op" => op, "outcome" => outcome).increment(1);
    metrics::histogram!("remote_request_seconds", "op" => op).record(started.elapsed().as_secs_f64());
    if let Err(e) = result {
        warn!(op, error = %e, "remote call failed");
    }
}

#[async_trait::async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, req: &CompletionRequest) -> Result<String> {
        debug!(model = %self.inner.model, prompt_len = req.prompt.len(), "completion request");
        let started = Instant::now();
        let result: Result<_> = async {
            let body = CompletionBody {
                model: &self.inner.model,
                prompt: &req.prompt,
                max_tokens: req.max_tokens,
                stop: &req.stop,
            };
            let resp = self
                .inner
                .http
                .post(self.url("completions"))
                .bearer_auth(&self.inner.api_key)
                .json(&body)
                .send()
                .await?;
            let data: CompletionResponse = Self::check(resp).await?.json().await?;
            data.choices
                .into_iter()
                .next()
                .map(|c| c.text)
                .ok_or_else(|| AppError::Unexpected("completion response had no choices".to_string()))
        }
        .await;
        observe("completion", started, &result);
        result
    }
}

#[async_trait::async_trait]
impl TrainingBackend for OpenAiBackend {
    async fn upload_file(&self, file_name: &str, bytes: Vec<u8>, purpose: &str) -> Result<FileHandle> {
        debug!(file_name, size = bytes.len(), purpose, "file upload");
        let started = Instant::now();
        let result: Result<_> = async {
            let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
            let form = multipart::Form::new()
                .text("purpose", purpose.to_string())
                .part("file", part);
            let resp = self
                .inner
                .http
                .post(self.url("files"))
                .bearer_auth(&self.inner.api_key)
                .multipart(form)
                .send()
                .await?;
            let data: IdResponse = Self::check(resp).await?.json().await?;
            Ok(FileHandle(data.id))
        }
        .await;
        observe("upload_file", started, &result);
        result
    }

    async fn create_fine_tune(&self, training_file: &FileHandle, model: &str) -> Result<FineTuneJobHandle> {
        debug!(training_file = %training_file, model, "fine-tune job");
        let started = Instant::now();
        let result: Result<_> = async {
            let body = FineTuneBody { training_file: &training_file.0, model };
            let resp = self
                .inner
                .http
                .post(self.url("fine_tuning/jobs"))
                .bearer_auth(&self.inner.api_key)
                .json(&body)
                .send()
                .await?;
            let data: IdResponse = Self::check(resp).await?.json().await?;
            Ok(FineTuneJobHandle(data.id))
        }
        .await;
        observe("create_fine_tune", started, &result);
        result
    }
}
