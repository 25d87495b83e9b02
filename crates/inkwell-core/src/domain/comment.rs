use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity. Immutable once created; it can only be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}
