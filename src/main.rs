use faq_chatbot::{api, config::Config, model::openai::OpenAiBackend, util};
use dotenvy::dotenv;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;


#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
dotenv().ok();
let cfg = <Config as clap::Parser>::parse();


// logs
util::init_tracing();


// metrics
if let Some(addr) = cfg.metrics_addr.as_deref() {
let addr: SocketAddr = addr.parse()?;
PrometheusBuilder::new().with_http_listener(addr).install()?;
tracing::info!(%addr, "metrics exporter listening");
}


// remote backend; refuses to start on a placeholder key
let backend = OpenAiBackend::new(&cfg.api)?.with_completion_model(cfg.completion_model.clone());
tracing::info!(model = backend.completion_model(), api_base = %cfg.api.api_base, "completion backend ready");


let app = api::routes(Arc::new(backend), cfg.max_tokens, cfg.max_body_bytes);
let app = api::with_http_layers(app, cfg.cors_allow_origin.as_deref())?;
let addr: SocketAddr = cfg.bind_addr.parse()?;


tracing::info!(%addr, "listening");
axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
.with_graceful_shutdown(shutdown_signal())
.await?;
Ok(())
}


async fn shutdown_signal() {
if tokio::signal::ctrl_c().await.is_ok() {
tracing::info!("shutting down");
}
}
