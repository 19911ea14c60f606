//! Rewrites a `{"questions": [...]}` JSON dataset as JSONL.

use clap::Parser;
use faq_chatbot::{dataset, util};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "convert-dataset", about = "Convert a JSON Q&A dataset to JSONL")]
struct Args {
    #[arg(long, short, default_value = "data/FAQ_data_cleaned.json")]
    input: PathBuf,
    #[arg(long, short, default_value = "data/FAQ_data_cleaned_converted.jsonl")]
    output: PathBuf,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    util::init_tracing();
    let args = Args::parse();

    match dataset::convert_to_jsonl(&args.input, &args.output) {
        Ok(report) => {
            if report.empty {
                println!(
                    "Warning: No 'questions' key found or it is empty in {}.",
                    args.input.display()
                );
            }
            println!(
                "Successfully converted '{}' to '{}' in JSONL format ({} records).",
                args.input.display(),
                args.output.display(),
                report.records
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "conversion failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
