use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - a registered author/reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name: None,
            bio: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a user's profile. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl UserChanges {
    /// Apply the changes in place, stamping `updated_at`.
    pub fn apply(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio);
        }
        if let Some(picture) = self.profile_picture {
            user.profile_picture = Some(picture);
        }
        user.updated_at = Utc::now();
    }
}
