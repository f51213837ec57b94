//! Integration tests for `OllamaClient` against a local fake `/api/chat` server.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use scout_core::{ChatModel, ChatRequest, Message, ModelError, ToolDescriptor};
use scout_model::{OllamaClient, OllamaConfig};
use serde_json::{Value, json};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn spawn_server(app: Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    (format!("http://{}/api/chat", addr), handle)
}

async fn tool_calling_chat(
    State(captured): State<Captured>,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.lock().unwrap().push(body);
    Json(json!({
        "model": "llama3.2",
        "message": {
            "role": "assistant",
            "content": "",
            "tool_calls": [
                {"function": {
                    "name": "analyze_repository",
                    "arguments": {"repository_path": "/srv/repo"}
                }}
            ]
        },
        "done": true
    }))
}

async fn failing_chat() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded")
}

#[tokio::test]
async fn test_chat_sends_model_tools_and_parses_tool_calls() {
    let captured: Captured = Arc::default();
    let app =
        Router::new().route("/api/chat", post(tool_calling_chat)).with_state(captured.clone());
    let (url, handle) = spawn_server(app).await;

    let client = OllamaClient::new(OllamaConfig::new(url, "llama3.2")).unwrap();
    let request = ChatRequest::new(vec![Message::system("sys"), Message::user("look at /srv/repo")])
        .with_tools(vec![ToolDescriptor::new(
            "analyze_repository",
            "Analyze a repository",
            json!({"type": "object", "properties": {"repository_path": {"type": "string"}}}),
        )]);

    let response = client.chat(request).await.expect("chat succeeds");
    let call = response.first_tool_call().expect("tool call present");
    assert_eq!(call.name(), "analyze_repository");
    assert_eq!(call.arguments()["repository_path"], "/srv/repo");

    let bodies = captured.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "llama3.2");
    assert_eq!(bodies[0]["stream"], false);
    assert_eq!(bodies[0]["messages"][1]["content"], "look at /srv/repo");
    assert_eq!(bodies[0]["tools"][0]["function"]["name"], "analyze_repository");

    handle.abort();
}

#[tokio::test]
async fn test_non_success_status_carries_code_and_body() {
    let app = Router::new().route("/api/chat", post(failing_chat));
    let (url, handle) = spawn_server(app).await;

    let client = OllamaClient::new(OllamaConfig::new(url, "llama3.2")).unwrap();
    let err = client.chat(ChatRequest::new(vec![Message::user("hi")])).await.unwrap_err();

    match err {
        ModelError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    handle.abort();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let client =
        OllamaClient::new(OllamaConfig::new("http://127.0.0.1:1/api/chat", "llama3.2")).unwrap();
    let err = client.chat(ChatRequest::new(vec![Message::user("hi")])).await.unwrap_err();
    assert!(matches!(err, ModelError::Transport(_)));
}

#[test]
fn test_empty_model_is_rejected() {
    assert!(matches!(
        OllamaClient::new(OllamaConfig::default().with_model("")),
        Err(ModelError::Config(_))
    ));
}
