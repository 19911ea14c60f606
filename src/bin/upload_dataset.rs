//! Uploads a dataset file to remote storage and prints its file id.

use clap::Parser;
use faq_chatbot::{config::ApiConfig, model::openai::OpenAiBackend, upload, util};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "upload-dataset", about = "Upload a JSONL dataset for fine-tuning")]
struct Args {
    #[command(flatten)]
    api: ApiConfig,
    #[arg(long, short, default_value = "data/FAQ_data_cleaned_converted.jsonl")]
    path: PathBuf,
    #[arg(long, default_value = upload::DEFAULT_PURPOSE)]
    purpose: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    util::init_tracing();
    let args = Args::parse();
    let backend = OpenAiBackend::new(&args.api)?;

    match upload::upload_dataset(&backend, &args.path, &args.purpose).await {
        Ok(file) => {
            println!("Successfully uploaded dataset. File ID: {file}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, path = %args.path.display(), "upload failed");
            eprintln!("Error: Failed to upload dataset. Details: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
