//! PostgreSQL chat store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::debug;
use uuid::Uuid;

use super::{ChatStore, ChatUpdate, StoreResult, UpdateOutcome};
use crate::models::{Chat, Code, Message, NewChat};
use crate::uuid::uuidv7;

/// Row returned by chat queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChatRow {
    id: Uuid,
    user_id: String,
    name: String,
    messages: Json<Vec<Message>>,
    code: Json<Code>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            messages: row.messages.0,
            code: row.code.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Chat store backed by the `chats` table.
#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Chat>> {
        let rows = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, user_id, name, messages, code, created_at, updated_at
            FROM chats
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Chat::from).collect())
    }

    async fn find_one(&self, id: Uuid) -> StoreResult<Option<Chat>> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, user_id, name, messages, code, created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chat::from))
    }

    async fn insert_one(&self, chat: NewChat) -> StoreResult<Chat> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            INSERT INTO chats (id, user_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, messages, code, created_at, updated_at
            "#,
        )
        .bind(uuidv7())
        .bind(&chat.user_id)
        .bind(&chat.name)
        .fetch_one(&self.pool)
        .await?;

        debug!(chat_id = %row.id, user_id = %row.user_id, "inserted chat");
        Ok(row.into())
    }

    async fn update_one(
        &self,
        id: Uuid,
        update: &ChatUpdate,
        upsert: bool,
    ) -> StoreResult<UpdateOutcome> {
        let messages = Json(&update.push_messages);
        let code = Json(&update.set_code);

        if !upsert {
            let result = sqlx::query(
                r#"
                UPDATE chats
                SET name = COALESCE($2, name),
                    messages = messages || $3,
                    code = code || $4,
                    updated_at = now()
                WHERE id = $1
                "#,
            )
            .bind(id)
            .bind(update.set_name.as_deref())
            .bind(messages)
            .bind(code)
            .execute(&self.pool)
            .await?;

            debug!(chat_id = %id, matched = result.rows_affected(), "updated chat");
            return Ok(UpdateOutcome {
                matched: result.rows_affected(),
                upserted: false,
            });
        }

        // `xmax = 0` only holds for a freshly inserted tuple.
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO chats (id, user_id, name, messages, code)
            VALUES (
                $1,
                '',
                COALESCE($2, 'New Chat'),
                $3,
                '{"html": "", "css": "", "js": ""}'::jsonb || $4
            )
            ON CONFLICT (id) DO UPDATE
            SET name = COALESCE($2, chats.name),
                messages = chats.messages || EXCLUDED.messages,
                code = chats.code || $4,
                updated_at = now()
            RETURNING (xmax = 0)
            "#,
        )
        .bind(id)
        .bind(update.set_name.as_deref())
        .bind(messages)
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        debug!(chat_id = %id, upserted = inserted, "upserted chat");
        Ok(UpdateOutcome {
            matched: u64::from(!inserted),
            upserted: inserted,
        })
    }

    async fn delete_one(&self, id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(chat_id = %id, deleted = result.rows_affected(), "deleted chat");
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
