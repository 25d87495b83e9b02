//! Profile reads and owner-only profile mutations.

use std::sync::Arc;

use uuid::Uuid;

use crate::authorization::{UserDeletionPolicy, ensure_can_mutate};
use crate::domain::{User, UserChanges};
use crate::error::{DomainError, DomainResult};
use crate::ports::{BaseRepository, ImageStore, UploadedImage};

use super::{Repositories, non_blank};

#[derive(Clone)]
pub struct UserService {
    repos: Repositories,
    images: Arc<dyn ImageStore>,
    deletion: UserDeletionPolicy,
}

impl UserService {
    pub fn new(
        repos: Repositories,
        images: Arc<dyn ImageStore>,
        deletion: UserDeletionPolicy,
    ) -> Self {
        Self {
            repos,
            images,
            deletion,
        }
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<User> {
        self.repos
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Update the profile of `id`. Only the user themselves may do this.
    pub async fn update(
        &self,
        actor: Uuid,
        id: Uuid,
        full_name: Option<String>,
        bio: Option<String>,
        picture: Option<UploadedImage>,
    ) -> DomainResult<User> {
        ensure_can_mutate(actor, &id)?;

        if let Some(picture) = &picture {
            picture.validate()?;
        }

        // Nothing gets written to disk for a user that does not exist.
        self.get(id).await?;

        let profile_picture = match picture {
            Some(picture) => Some(self.images.save(picture).await?),
            None => None,
        };

        let changes = UserChanges {
            full_name: non_blank(full_name),
            bio: non_blank(bio),
            profile_picture,
        };

        self.repos
            .users
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Delete the account `id`, applying the configured deletion policy to
    /// the user's content.
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> DomainResult<()> {
        ensure_can_mutate(actor, &id)?;

        if self.deletion == UserDeletionPolicy::Cascade {
            self.get(id).await?;

            let likes = self.repos.likes.delete_by_user(id).await?;
            let comments = self.repos.comments.delete_by_author(id).await?;
            let posts = self.repos.posts.delete_by_author(id).await?;
            tracing::info!(user_id = %id, likes, comments, posts, "Cascaded user content");
        }

        if !self.repos.users.delete(id).await? {
            return Err(DomainError::not_found("User", id));
        }

        tracing::info!(user_id = %id, policy = ?self.deletion, "User deleted");
        Ok(())
    }
}
