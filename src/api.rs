use crate::{
    conversation::{validate_question, ConversationManager},
    error::{AppError, Result},
    model::CompletionBackend,
};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Upper bound on request bodies. Conversation history is client-owned and
/// grows every turn, so this sits well above axum's 2 MB default.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
pub struct AnswerResp {
    pub answer: String,
}

#[derive(Serialize)]
pub struct ConversationResp {
    pub answer: String,
    pub history: String,
}

struct AppState<B> {
    manager: ConversationManager<B>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self { manager: self.manager.clone() }
    }
}

/// Unwraps the JSON body; only an object is accepted.
fn body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>> {
    match payload {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Ok(Json(_)) => Err(AppError::Validation("Request body must be a JSON object".to_string())),
        Err(rejection) => {
            warn!(%rejection, "unreadable request body");
            Err(AppError::Validation(format!("Invalid request body: {}", rejection.body_text())))
        }
    }
}

/// A string field that may be absent or null.
fn optional_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(AppError::Validation(format!("'{name}' must be a string"))),
    }
}

fn required_question(fields: &Map<String, Value>) -> Result<&str> {
    validate_question(optional_str(fields, "question")?)
}

fn report(e: AppError) -> AppError {
    if matches!(e, AppError::Validation(_)) {
        warn!(error = %e, "rejected request");
    } else {
        tracing::error!(error = %e, "request failed");
    }
    e
}

async fn single_question<B: CompletionBackend>(
    State(state): State<AppState<B>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnswerResp>> {
    let fields = body(payload).map_err(report)?;
    let question = required_question(&fields).map_err(report)?;
    let answer = state.manager.ask(question).await.map_err(report)?;
    Ok(Json(AnswerResp { answer }))
}

async fn conversation<B: CompletionBackend>(
    State(state): State<AppState<B>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ConversationResp>> {
    let fields = body(payload).map_err(report)?;
    let question = required_question(&fields).map_err(report)?;
    let history = optional_str(&fields, "history").map_err(report)?.unwrap_or_default();
    let out = state.manager.converse(question, history).await.map_err(report)?;
    Ok(Json(ConversationResp { answer: out.answer, history: out.history }))
}

pub fn routes<B: CompletionBackend>(backend: Arc<B>, max_tokens: u32, max_body_bytes: usize) -> Router {
    let state = AppState { manager: ConversationManager::new(backend).with_max_tokens(max_tokens) };
    Router::new()
        .route("/api/single-question", post(single_question::<B>))
        .route("/api/conversation", post(conversation::<B>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Request tracing plus, when an origin is given, CORS for a browser front end.
pub fn with_http_layers(router: Router, cors_allow_origin: Option<&str>) -> anyhow::Result<Router> {
    let router = match cors_allow_origin {
        Some(origin) => {
            let allow = if origin == "*" {
                AllowOrigin::from(Any)
            } else {
                AllowOrigin::exact(HeaderValue::from_str(origin)?)
            };
            router.layer(
                CorsLayer::new()
                    .allow_origin(allow)
                    .allow_methods([Method::POST])
                    .allow_headers([header::CONTENT_TYPE]),
            )
        }
        None => router,
    };
    Ok(router.layer(TraceLayer::new_for_http()))
}
