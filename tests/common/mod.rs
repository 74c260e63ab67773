#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Scriptable stand-in for the Coze V3 API, served on an ephemeral local
/// port. Statuses are consumed front-to-back by successive retrieve calls;
/// once the queue is empty the backend keeps reporting "in_progress".
#[derive(Clone)]
pub struct MockBackend {
    pub submit_code: i64,
    pub submit_msg: Option<String>,
    pub omit_submit_data: bool,
    pub conversation_id: String,
    pub statuses: Arc<Mutex<VecDeque<String>>>,
    pub poll_calls: Arc<AtomicUsize>,
    pub messages: Arc<Mutex<Vec<Value>>>,
    pub last_submit: Arc<Mutex<Option<Value>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            submit_code: 0,
            submit_msg: None,
            omit_submit_data: false,
            conversation_id: "conv_mock".to_string(),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            poll_calls: Arc::new(AtomicUsize::new(0)),
            messages: Arc::new(Mutex::new(vec![
                json!({"role": "assistant", "type": "verbose", "content": "{}"}),
                json!({"role": "assistant", "type": "answer", "content": "Hello"}),
                json!({"role": "assistant", "type": "follow_up", "content": "Anything else?"}),
            ])),
            last_submit: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_statuses(self, statuses: &[&str]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_submit_error(mut self, code: i64, msg: &str) -> Self {
        self.submit_code = code;
        self.submit_msg = Some(msg.to_string());
        self
    }

    pub fn with_messages(self, messages: Vec<Value>) -> Self {
        *self.messages.lock().unwrap() = messages;
        self
    }

    pub async fn serve(self) -> String {
        let app = Router::new()
            .route("/chat", post(submit))
            .route("/chat/retrieve", get(retrieve))
            .route("/chat/message/list", get(list))
            .with_state(self);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn submit(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Json<Value> {
    *backend.last_submit.lock().unwrap() = Some(body.clone());

    if backend.submit_code != 0 {
        return Json(json!({"code": backend.submit_code, "msg": backend.submit_msg}));
    }
    if backend.omit_submit_data {
        return Json(json!({"code": 0, "msg": ""}));
    }

    // Reuse a supplied conversation id, mint one otherwise.
    let conversation_id = body
        .get("conversation_id")
        .and_then(Value::as_str)
        .unwrap_or(&backend.conversation_id)
        .to_string();
    Json(json!({
        "code": 0,
        "msg": "",
        "data": {"id": "chat_mock", "conversation_id": conversation_id}
    }))
}

async fn retrieve(State(backend): State<MockBackend>) -> Json<Value> {
    backend
        .poll_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let status = backend
        .statuses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| "in_progress".to_string());
    Json(json!({"data": {"status": status}}))
}

async fn list(State(backend): State<MockBackend>) -> Json<Value> {
    let messages = backend.messages.lock().unwrap().clone();
    Json(json!({"data": messages}))
}
