use axum::{Json, extract::State};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::coze::ChatParams,
    state::SharedState,
};

const DEFAULT_USER_ID: &str = "user_001";

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let params = ChatParams {
        token: required(payload.token)?,
        bot_id: required(payload.bot_id)?,
        message: required(payload.message)?,
        user_id: payload
            .user_id
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        conversation_id: payload.conversation_id,
    };

    tracing::info!(bot_id = %params.bot_id, user_id = %params.user_id, "relaying chat");

    let outcome = state.coze.converse(&params).await?;
    Ok(Json(ChatResponse::success(
        outcome.reply,
        outcome.conversation_id,
    )))
}

fn required(field: Option<String>) -> Result<String, AppError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::MissingParameters),
    }
}
