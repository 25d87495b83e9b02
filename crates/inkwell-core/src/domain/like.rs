use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Like entity. At most one row exists per `(post_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
