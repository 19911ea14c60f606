//! Submits a fine-tuning job for an uploaded training file.

use clap::Parser;
use faq_chatbot::{config::ApiConfig, fine_tune, model::openai::OpenAiBackend, model::FileHandle, util};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fine-tune", about = "Create a fine-tuning job from an uploaded file")]
struct Args {
    #[command(flatten)]
    api: ApiConfig,
    /// File id returned by `upload-dataset`.
    #[arg(long, env = "TRAINING_FILE_ID")]
    training_file_id: String,
    #[arg(long, default_value = fine_tune::DEFAULT_BASE_MODEL)]
    model: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    util::init_tracing();
    let args = Args::parse();
    let backend = OpenAiBackend::new(&args.api)?;

    let file = FileHandle(args.training_file_id);
    match fine_tune::submit_fine_tune(&backend, &file, &args.model).await {
        Ok(job) => {
            println!("Fine-tuning job created. Job ID: {job}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, training_file = %file, "fine-tune submission failed");
            eprintln!("Error: Failed to create fine-tune job. Details: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
