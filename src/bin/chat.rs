//! Interactive single-session chat that keeps its own transcript.
//!
//! Each stdin line is a question. `/reset` starts a fresh session and
//! `/exit` (or EOF) quits.

use clap::Parser;
use faq_chatbot::{
    config::ApiConfig,
    conversation::{ChatSession, Transcript},
    model::openai::{OpenAiBackend, DEFAULT_COMPLETION_MODEL},
    util,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "chat", about = "Chat with a base or fine-tuned completion model")]
struct Args {
    #[command(flatten)]
    api: ApiConfig,
    #[arg(long, env = "COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL)]
    model: String,
    /// Takes precedence over `--model`.
    #[arg(long, env = "FINE_TUNED_MODEL")]
    fine_tuned_model: Option<String>,
    /// Most recent exchanges kept in the prompt; unlimited when unset.
    #[arg(long, env)]
    max_exchanges: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    util::init_tracing();
    let args = Args::parse();

    let model = args.fine_tuned_model.unwrap_or(args.model);
    let backend = OpenAiBackend::new(&args.api)?.with_completion_model(model);
    let transcript = match args.max_exchanges {
        Some(max) => Transcript::bounded(max),
        None => Transcript::unbounded(),
    };
    let mut session = ChatSession::new(Arc::new(backend), transcript);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else { break };
        match line.trim() {
            "" => continue,
            "/exit" => break,
            "/reset" => {
                let dropped = session.len();
                session.reset();
                println!("(conversation reset, {dropped} exchanges cleared)");
            }
            question => match session.ask(question).await {
                Ok(answer) => println!("{answer}"),
                Err(e) => eprintln!("Error: Failed to get a response. Details: {e}"),
            },
        }
    }
    Ok(())
}
