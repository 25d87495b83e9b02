use uuid::Uuid;

use crate::domain::Like;
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::BaseRepository;

use super::Repositories;

#[derive(Clone)]
pub struct LikeService {
    repos: Repositories,
}

impl LikeService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Flip the actor's like on a post. Returns the resulting state.
    pub async fn toggle(&self, actor: Uuid, post_id: Uuid) -> DomainResult<bool> {
        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        if let Some(like) = self.repos.likes.find_user_like(post_id, actor).await? {
            self.repos.likes.delete(like.id).await?;
            tracing::debug!(post_id = %post_id, user_id = %actor, "Like removed");
            return Ok(false);
        }

        match self.repos.likes.insert(Like::new(post_id, actor)).await {
            Ok(_) => {}
            // A concurrent toggle already inserted the pair.
            Err(RepoError::Constraint(_)) => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(post_id = %post_id, user_id = %actor, "Like added");
        Ok(true)
    }
}
