//! Chat request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{
    ChatDetailResponse, ChatListResponse, ChatSummaryResponse, CreateChatRequest,
    MessageResponse, PostMessageResponse, PromptRequest, RenameChatRequest,
};

/// `GET /api/users/{user_id}/chats` — list a user's chats.
pub async fn list_chats_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ChatListResponse>> {
    let chats = state.chats.list_chats(&user_id).await?;
    Ok(Json(ChatListResponse {
        chats: chats.into_iter().map(Into::into).collect(),
    }))
}

/// `POST /api/users/{user_id}/chats` — create a chat, optionally named.
pub async fn create_chat_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Option<Json<CreateChatRequest>>,
) -> AppResult<(StatusCode, Json<ChatSummaryResponse>)> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let summary = state
        .chats
        .create_chat(&user_id, body.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(summary.into())))
}

/// `GET /api/chats/{chat_id}` — full chat with messages and code.
pub async fn get_chat_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> AppResult<Json<ChatDetailResponse>> {
    let chat = state.chats.get_chat(&chat_id).await?;
    Ok(Json(chat.into()))
}

/// `PATCH /api/chats/{chat_id}` — rename a chat.
pub async fn rename_chat_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(body): Json<RenameChatRequest>,
) -> AppResult<Json<MessageResponse>> {
    body.validate()?;
    state.chats.rename_chat(&chat_id, &body.name).await?;
    Ok(Json(MessageResponse::new("Chat renamed successfully.")))
}

/// `DELETE /api/chats/{chat_id}` — delete a chat.
pub async fn delete_chat_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.chats.delete_chat(&chat_id).await?;
    Ok(Json(MessageResponse::new("Chat deleted successfully.")))
}

/// `POST /api/chats/{chat_id}/messages` — send a prompt and record the reply.
pub async fn post_message_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(body): Json<PromptRequest>,
) -> AppResult<Json<PostMessageResponse>> {
    body.validate()?;
    let posted = state.chats.post_message(&body.input, &chat_id).await?;
    Ok(Json(posted.into()))
}
