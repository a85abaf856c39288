//! Route paths.

pub const API_HELLO: &str = "/api/hello";
/// `GET` lists, `POST` creates.
pub const USER_CHATS: &str = "/api/users/{user_id}/chats";
/// `GET` fetches, `PATCH` renames, `DELETE` deletes.
pub const CHAT: &str = "/api/chats/{chat_id}";
pub const CHAT_MESSAGES: &str = "/api/chats/{chat_id}/messages";
