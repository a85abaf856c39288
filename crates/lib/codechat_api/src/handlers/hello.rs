//! Hello world endpoint — bootstrap health check.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::HelloWorldResponse;

/// `GET /api/hello` — verifies core lib and store connectivity.
pub async fn hello_world(State(state): State<AppState>) -> AppResult<Json<HelloWorldResponse>> {
    let greeting = codechat_core::hello::hello_world();
    let db_connected = state.chats.store_reachable().await;

    Ok(Json(HelloWorldResponse {
        greeting,
        db_connected,
    }))
}
