//! Coze V3 chat orchestration.
//!
//! One call runs three remote steps in order: submit the chat, poll its
//! status on a fixed cadence until it completes, then fetch the message list
//! and pick the assistant's answer. All state (conversation history, task
//! status) lives on the backend; the client is stateless between calls and
//! the caller's token is passed through on every request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::error::AppError;

const COZE_API_BASE: &str = "https://api.coze.cn/v3";

// The caller typically runs under a request-duration ceiling of its own, so
// the wait budget stays in the low tens of seconds.
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLL_ATTEMPTS: u32 = 15;

#[derive(Debug, Clone)]
pub struct ChatParams {
    pub token: String,
    pub bot_id: String,
    pub user_id: String,
    pub message: String,
    /// Continues an existing backend session when set; otherwise the backend
    /// opens a fresh one.
    pub conversation_id: Option<String>,
}

#[derive(Debug)]
pub struct ChatOutcome {
    pub reply: String,
    /// Session id used or created, echoed back so the caller can supply it
    /// on the next turn.
    pub conversation_id: String,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    bot_id: &'a str,
    user_id: &'a str,
    stream: bool,
    auto_save_history: bool,
    additional_messages: [SubmitMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

#[derive(Serialize)]
struct SubmitMessage<'a> {
    role: &'static str,
    content: &'a str,
    content_type: &'static str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    code: i64,
    msg: Option<String>,
    data: Option<SubmitData>,
}

#[derive(Deserialize)]
struct SubmitData {
    id: String,
    conversation_id: String,
}

#[derive(Deserialize)]
struct RetrieveResponse {
    data: Option<RetrieveData>,
}

#[derive(Deserialize)]
struct RetrieveData {
    status: String,
}

#[derive(Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    data: Vec<BackendMessage>,
}

#[derive(Deserialize)]
struct BackendMessage {
    role: String,
    #[serde(rename = "type")]
    kind: String,
    content: String,
}

#[derive(Clone)]
pub struct CozeClient {
    http: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl CozeClient {
    pub fn new() -> Self {
        Self::with_base_url(COZE_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            poll_interval: POLL_INTERVAL,
            max_poll_attempts: MAX_POLL_ATTEMPTS,
        }
    }

    /// Override the polling cadence and attempt ceiling. Tests use this to
    /// avoid real multi-second waits.
    pub fn poll_policy(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.max_poll_attempts = max_attempts;
        self.poll_interval = interval;
        self
    }

    /// Run one full chat turn: submit, wait for completion, fetch the answer.
    /// Nothing is retried beyond the bounded status polling itself.
    pub async fn converse(&self, params: &ChatParams) -> Result<ChatOutcome, AppError> {
        let (conversation_id, chat_id) = self.submit(params).await?;
        tracing::debug!(%chat_id, %conversation_id, "chat created, polling status");

        self.wait_for_completion(&params.token, &conversation_id, &chat_id)
            .await?;

        let reply = self
            .fetch_answer(&params.token, &conversation_id, &chat_id)
            .await?;
        Ok(ChatOutcome {
            reply,
            conversation_id,
        })
    }

    async fn submit(&self, params: &ChatParams) -> Result<(String, String), AppError> {
        let body = SubmitBody {
            bot_id: &params.bot_id,
            user_id: &params.user_id,
            stream: false,
            auto_save_history: true,
            additional_messages: [SubmitMessage {
                role: "user",
                content: &params.message,
                content_type: "text",
            }],
            conversation_id: params.conversation_id.as_deref(),
        };

        let resp: SubmitResponse = self
            .http
            .post(format!("{}/chat", self.base_url))
            .bearer_auth(&params.token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        match resp.data {
            Some(data) if resp.code == 0 => Ok((data.conversation_id, data.id)),
            _ => Err(AppError::Submission(
                resp.msg
                    .unwrap_or_else(|| format!("backend code {}", resp.code)),
            )),
        }
    }

    async fn wait_for_completion(
        &self,
        token: &str,
        conversation_id: &str,
        chat_id: &str,
    ) -> Result<(), AppError> {
        for attempt in 1..=self.max_poll_attempts {
            sleep(self.poll_interval).await;

            let resp: RetrieveResponse = self
                .http
                .get(format!("{}/chat/retrieve", self.base_url))
                .query(&[("conversation_id", conversation_id), ("chat_id", chat_id)])
                .bearer_auth(token)
                .send()
                .await?
                .json()
                .await?;

            if let Some(data) = resp.data {
                tracing::debug!(status = %data.status, attempt, "chat status");
                match data.status.as_str() {
                    "completed" => return Ok(()),
                    "failed" | "canceled" => return Err(AppError::Processing(data.status)),
                    // "created", "in_progress", ... keep waiting
                    _ => {}
                }
            }
        }
        Err(AppError::Timeout(self.max_poll_attempts))
    }

    async fn fetch_answer(
        &self,
        token: &str,
        conversation_id: &str,
        chat_id: &str,
    ) -> Result<String, AppError> {
        let resp: MessageListResponse = self
            .http
            .get(format!("{}/chat/message/list", self.base_url))
            .query(&[("conversation_id", conversation_id), ("chat_id", chat_id)])
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;

        resp.data
            .into_iter()
            .find(|m| m.role == "assistant" && m.kind == "answer")
            .map(|m| m.content)
            .ok_or(AppError::NotFound)
    }
}

impl Default for CozeClient {
    fn default() -> Self {
        Self::new()
    }
}
