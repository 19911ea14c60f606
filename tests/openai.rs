//! OpenAI client against a local mock server.

use faq_chatbot::config::ApiConfig;
use faq_chatbot::model::openai::OpenAiBackend;
use faq_chatbot::model::{CompletionBackend, CompletionRequest, FileHandle, TrainingBackend};
use faq_chatbot::AppError;
use mockito::Matcher;
use serde_json::json;

fn backend(server: &mockito::Server) -> OpenAiBackend {
    let api = ApiConfig {
        api_key: "sk-test".to_string(),
        api_base: server.url(),
        request_timeout_secs: 5,
    };
    OpenAiBackend::new(&api).unwrap()
}

#[tokio::test]
async fn completion_sends_prompt_and_stops() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::Json(json!({
            "model": "ft-faq",
            "prompt": "Human: hi\nAI:",
            "max_tokens": 150,
            "stop": ["\n", "Human:", "AI:"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"cmpl-1","choices":[{"text":" Hello!","index":0,"finish_reason":"stop"}]}"#)
        .create_async()
        .await;

    let backend = backend(&server).with_completion_model("ft-faq");
    let req = CompletionRequest::new("Human: hi\nAI:", 150).stop_at_turn_boundary();
    assert_eq!(backend.complete(&req).await.unwrap(), " Hello!");
    mock.assert_async().await;
}

#[tokio::test]
async fn single_question_omits_stop() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/completions")
        .match_body(Matcher::Json(json!({
            "model": "text-davinci-003",
            "prompt": "What are your hours?",
            "max_tokens": 150
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"text":"9 to 5"}]}"#)
        .create_async()
        .await;

    let req = CompletionRequest::new("What are your hours?", 150);
    assert_eq!(backend(&server).complete(&req).await.unwrap(), "9 to 5");
    mock.assert_async().await;
}

#[tokio::test]
async fn provider_error_message_is_preserved() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided: sk-test.","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = backend(&server)
        .complete(&CompletionRequest::new("hi", 150))
        .await
        .unwrap_err();
    match err {
        AppError::RemoteService(msg) => assert_eq!(msg, "401: Incorrect API key provided: sk-test."),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn no_choices_is_unexpected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = backend(&server)
        .complete(&CompletionRequest::new("hi", 150))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unexpected(_)));
}

#[tokio::test]
async fn upload_returns_file_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/files")
        .match_header("authorization", "Bearer sk-test")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("fine-tune".to_string()),
            Matcher::Regex(r#"filename="faq.jsonl""#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"id":"file-abc123","object":"file","purpose":"fine-tune"}"#)
        .create_async()
        .await;

    let file = backend(&server)
        .upload_file("faq.jsonl", b"{\"a\": 1}\n".to_vec(), "fine-tune")
        .await
        .unwrap();
    assert_eq!(file, FileHandle("file-abc123".to_string()));
    mock.assert_async().await;
}

#[tokio::test]
async fn fine_tune_returns_job_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/fine_tuning/jobs")
        .match_body(Matcher::Json(json!({"training_file": "file-abc123", "model": "davinci"})))
        .with_status(200)
        .with_body(r#"{"id":"ftjob-42","status":"queued"}"#)
        .create_async()
        .await;

    let job = backend(&server)
        .create_fine_tune(&FileHandle("file-abc123".to_string()), "davinci")
        .await
        .unwrap();
    assert_eq!(job.to_string(), "ftjob-42");
    mock.assert_async().await;
}

#[test]
fn placeholder_key_is_rejected() {
    let api = ApiConfig {
        api_key: "your-api-key-here".to_string(),
        api_base: "http://127.0.0.1:1".to_string(),
        request_timeout_secs: 5,
    };
    assert!(matches!(OpenAiBackend::new(&api), Err(AppError::Config(_))));
}

#[tokio::test]
async fn silent_server_times_out_as_remote_error() {
    // accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });

    let api = ApiConfig {
        api_key: "sk-test".to_string(),
        api_base: format!("http://{addr}"),
        request_timeout_secs: 1,
    };
    let err = OpenAiBackend::new(&api)
        .unwrap()
        .complete(&CompletionRequest::new("hi", 150))
        .await
        .unwrap_err();
    match err {
        AppError::RemoteService(msg) => assert!(msg.starts_with("request timed out"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
