use crate::error::{AppError, Result};
use clap::{Args, Parser};
use std::time::Duration;

/// Stand-in value shipped in sample env files; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Settings shared by every binary that talks to the remote API.
#[derive(Args, Debug, Clone)]
pub struct ApiConfig {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,
    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    pub api_base: String,
    #[arg(long, env, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        let key = self.api_key.trim();
        if key.is_empty() || key == PLACEHOLDER_API_KEY {
            return Err(AppError::Config(
                "OPENAI_API_KEY is unset or still the placeholder value".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "faq-chatbot", about = "Question answering and conversation over a hosted completion model")]
pub struct Config {
    #[command(flatten)]
    pub api: ApiConfig,
    #[arg(long, env, default_value = "0.0.0.0:5000")]
    pub bind_addr: String,
    #[arg(long, env, default_value = "text-davinci-003")]
    pub completion_model: String,
    #[arg(long, env, default_value_t = 150)]
    pub max_tokens: u32,
    /// Prometheus exporter listen address; disabled when unset.
    #[arg(long, env)]
    pub metrics_addr: Option<String>,
    /// Largest accepted request body; long conversations carry their whole history.
    #[arg(long, env, default_value_t = crate::api::DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
    /// Origin allowed to call the API from a browser, `*` for any.
    #[arg(long, env)]
    pub cors_allow_origin: Option<String>,
}
