// src/message.rs
use serde::{Deserialize, Serialize};

/// Inbound body for POST /chat. The required fields are modeled as options so
/// that a missing key reaches our own validation (400 "missing parameters")
/// instead of a serde rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub token: Option<String>,
    pub bot_id: Option<String>,
    pub message: Option<String>,
    pub user_id: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(reply: String, conversation_id: String) -> Self {
        Self {
            success: true,
            reply: Some(reply),
            conversation_id: Some(conversation_id),
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            reply: None,
            conversation_id: None,
            error: Some(error),
        }
    }
}
