//! # codechat_api
//!
//! HTTP API library for Codechat.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use axum::Router;
use axum::routing::{get, post};
use codechat_core::chats::ChatService;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{chats, hello};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat workflow over the configured store and AI provider.
    pub chats: ChatService,
}

/// Run embedded database migrations.
///
/// Delegates to `codechat_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    codechat_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::API_HELLO, get(hello::hello_world))
        .route(
            routes::USER_CHATS,
            get(chats::list_chats_handler).post(chats::create_chat_handler),
        )
        .route(
            routes::CHAT,
            get(chats::get_chat_handler)
                .patch(chats::rename_chat_handler)
                .delete(chats::delete_chat_handler),
        )
        .route(routes::CHAT_MESSAGES, post(chats::post_message_handler))
        .layer(cors)
        .with_state(state)
}
