//! Codechat API server binary.
//!
//! Serves the chat HTTP API over PostgreSQL (or an in-memory store for local
//! runs) with the configured AI provider.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use codechat_core::chats::{ChatService, ChatServiceOptions};
use codechat_core::store::{ChatStore, MemoryChatStore, PgChatStore};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// Where chats are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Postgres,
    Memory,
}

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "codechat_api_server", about = "Codechat API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3100)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/codechat"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Chat store backend. `memory` loses everything on exit.
    #[arg(long, env = "CHAT_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    store: StoreKind,

    /// AI provider: `gemini` or `local`.
    #[arg(long, env = "AI_PROVIDER", default_value = "gemini")]
    ai_provider: String,

    /// Recreate a chat that was deleted while a message to it was in flight.
    #[arg(long, env = "UPSERT_ON_POST", default_value_t = false)]
    upsert_on_post: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,codechat_api=debug,codechat_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    info!(
        store = ?args.store,
        ai_provider = %args.ai_provider,
        port = args.port,
        "starting codechat_api_server"
    );

    let store: Arc<dyn ChatStore> = match args.store {
        StoreKind::Postgres => {
            info!(max_connections = args.max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&args.database_url)
                .await?;

            info!("running database migrations");
            codechat_api::migrate(&pool).await?;
            Arc::new(PgChatStore::new(pool))
        }
        StoreKind::Memory => {
            warn!("using in-memory chat store, data is lost on exit");
            Arc::new(MemoryChatStore::new())
        }
    };

    let generator = codechat_core::ai::provider::from_name(&args.ai_provider)?;
    info!(provider = generator.name(), "AI provider ready");

    let chats = ChatService::with_options(
        store,
        generator,
        ChatServiceOptions {
            upsert_on_post: args.upsert_on_post,
        },
    );

    let app = codechat_api::router(codechat_api::AppState { chats });

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    Ok(())
}
