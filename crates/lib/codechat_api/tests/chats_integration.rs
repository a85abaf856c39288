//! Integration tests — build the router over the memory store and a scripted
//! generator, then drive every chat endpoint through `oneshot`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use codechat_api::AppState;
use codechat_core::ai::{AiError, CodeGenerator, Generation};
use codechat_core::chats::ChatService;
use codechat_core::store::MemoryChatStore;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Replays queued generations; an empty queue yields an upstream error.
#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<Generation>>,
}

impl ScriptedGenerator {
    fn with(replies: Vec<Generation>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl CodeGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _prompt: &str, _session_id: &str) -> Result<Generation, AiError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AiError::Provider("no scripted reply left".into()))
    }
}

fn generation(explanation: &str, html: &str, css: &str, js: &str) -> Generation {
    Generation {
        explanation: explanation.into(),
        html: html.into(),
        css: css.into(),
        js: js.into(),
    }
}

fn app(replies: Vec<Generation>) -> Router {
    let chats = ChatService::new(
        Arc::new(MemoryChatStore::new()),
        Arc::new(ScriptedGenerator::with(replies)),
    );
    codechat_api::router(AppState { chats })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

async fn create_chat(app: &Router, user_id: &str) -> String {
    let uri = format!("/api/users/{user_id}/chats");
    let (status, json) = send(app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().expect("id is string").to_string()
}

#[tokio::test]
async fn hello_reports_store_connected() {
    let app = app(vec![]);
    let (status, json) = send(&app, Method::GET, "/api/hello", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["dbConnected"], true);
    assert!(
        json["greeting"]
            .as_str()
            .unwrap()
            .starts_with("Hello from codechat_core v")
    );
}

#[tokio::test]
async fn create_then_list_returns_chat_once() {
    let app = app(vec![]);
    let id = create_chat(&app, "u1").await;
    create_chat(&app, "u2").await;

    let (status, json) = send(&app, Method::GET, "/api/users/u1/chats", None).await;
    assert_eq!(status, StatusCode::OK);
    let chats = json["chats"].as_array().unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0]["id"], id.as_str());
    assert_eq!(chats[0]["userId"], "u1");
    assert_eq!(chats[0]["name"], "New Chat");
}

#[tokio::test]
async fn list_for_unknown_user_is_empty_success() {
    let app = app(vec![]);
    let (status, json) = send(&app, Method::GET, "/api/users/ghost/chats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"chats": []}));
}

#[tokio::test]
async fn create_with_name_uses_it() {
    let app = app(vec![]);
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/users/u1/chats",
        Some(json!({"name": "Landing"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Landing");
}

#[tokio::test]
async fn scenario_first_prompt_builds_button() {
    let app = app(vec![generation("Here", "<button>", "", "")]);
    let id = create_chat(&app, "u1").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/chats/{id}/messages"),
        Some(json!({"input": "build a button"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "build a button");
    assert_eq!(json["message"], json!({"content": "Here", "type": "AI"}));
    assert_eq!(json["code"], json!({"html": "<button>", "css": "", "js": ""}));

    let (status, chat) = send(&app, Method::GET, &format!("/api/chats/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chat["name"], "build a button");
    assert_eq!(
        chat["messages"],
        json!([
            {"content": "build a button", "type": "USER"},
            {"content": "Here", "type": "AI"}
        ])
    );
    assert_eq!(chat["code"], json!({"html": "<button>", "css": "", "js": ""}));
}

#[tokio::test]
async fn later_prompts_keep_name_and_unset_fields() {
    let app = app(vec![
        generation("one", "<p>", "p{}", "a()"),
        generation("two", "<div>", "", "  "),
    ]);
    let id = create_chat(&app, "u1").await;
    let uri = format!("/api/chats/{id}/messages");

    send(&app, Method::POST, &uri, Some(json!({"input": "first"}))).await;
    let (status, json) = send(&app, Method::POST, &uri, Some(json!({"input": "second"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "first");

    let (_, chat) = send(&app, Method::GET, &format!("/api/chats/{id}"), None).await;
    assert_eq!(chat["messages"].as_array().unwrap().len(), 4);
    assert_eq!(chat["code"], json!({"html": "<div>", "css": "p{}", "js": "a()"}));
}

#[tokio::test]
async fn rename_and_delete_round_trip() {
    let app = app(vec![]);
    let id = create_chat(&app, "u1").await;

    let (status, json) = send(
        &app,
        Method::PATCH,
        &format!("/api/chats/{id}"),
        Some(json!({"name": "Renamed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Chat renamed successfully.");

    let (_, chat) = send(&app, Method::GET, &format!("/api/chats/{id}"), None).await;
    assert_eq!(chat["name"], "Renamed");

    let (status, json) = send(&app, Method::DELETE, &format!("/api/chats/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Chat deleted successfully.");

    let (status, json) = send(&app, Method::GET, &format!("/api/chats/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Chat not found");
}

#[tokio::test]
async fn malformed_chat_id_is_bad_request_everywhere() {
    let app = app(vec![generation("unused", "", "", "")]);
    let cases = [
        (Method::GET, "/api/chats/not-an-id", None),
        (Method::PATCH, "/api/chats/not-an-id", Some(json!({"name": "x"}))),
        (Method::DELETE, "/api/chats/not-an-id", None),
        (
            Method::POST,
            "/api/chats/not-an-id/messages",
            Some(json!({"input": "hi"})),
        ),
    ];
    for (method, uri, body) in cases {
        let (status, json) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "Invalid chat ID");
    }
}

#[tokio::test]
async fn padded_chat_id_is_bad_request() {
    let app = app(vec![generation("unused", "", "", "")]);
    let id = create_chat(&app, "u1").await;

    let (status, json) = send(&app, Method::GET, &format!("/api/chats/%20{id}%20"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid chat ID");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/chats/%20{id}/messages"),
        Some(json!({"input": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_chat_id_is_not_found_everywhere() {
    let app = app(vec![generation("unused", "", "", "")]);
    let missing = "0190b5a2-7c1e-7000-8000-000000000000";
    let cases = [
        (Method::GET, format!("/api/chats/{missing}"), None),
        (
            Method::PATCH,
            format!("/api/chats/{missing}"),
            Some(json!({"name": "x"})),
        ),
        (Method::DELETE, format!("/api/chats/{missing}"), None),
        (
            Method::POST,
            format!("/api/chats/{missing}/messages"),
            Some(json!({"input": "hi"})),
        ),
    ];
    for (method, uri, body) in cases {
        let (status, json) = send(&app, method, &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(json["error"], "not_found");
    }
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway_and_writes_nothing() {
    let app = app(vec![]);
    let id = create_chat(&app, "u1").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/chats/{id}/messages"),
        Some(json!({"input": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "upstream_error");

    let (_, chat) = send(&app, Method::GET, &format!("/api/chats/{id}"), None).await;
    assert_eq!(chat["messages"], json!([]));
    assert_eq!(chat["name"], "New Chat");
}

#[tokio::test]
async fn blank_prompt_is_rejected_at_the_boundary() {
    let app = app(vec![generation("unused", "", "", "")]);
    let id = create_chat(&app, "u1").await;

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/chats/{id}/messages"),
        Some(json!({"input": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
