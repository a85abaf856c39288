// Chat ids are generated app-side as UUIDv7 so that ordering by id roughly
// follows creation order, both in PostgreSQL and in the memory store.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a chat identifier from its textual form.
///
/// Only the hyphenated form is accepted. Padding, braces, URNs and the bare
/// 32-digit form are all rejected.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    if raw.len() != uuid::fmt::Hyphenated::LENGTH {
        return None;
    }
    Uuid::try_parse(raw).ok()
}
