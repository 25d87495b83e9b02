use uuid::Uuid;

use crate::authorization::{CommentDeletePolicy, ensure_can_mutate};
use crate::domain::Comment;
use crate::error::{DomainError, DomainResult};
use crate::ports::BaseRepository;

use super::assembly::enrich_comments;
use super::{CommentView, Repositories};

#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
    delete_policy: CommentDeletePolicy,
}

impl CommentService {
    pub fn new(repos: Repositories, delete_policy: CommentDeletePolicy) -> Self {
        Self {
            repos,
            delete_policy,
        }
    }

    /// Comments on a post, oldest first. An unknown post yields an empty list.
    pub async fn list(&self, post_id: Uuid) -> DomainResult<Vec<CommentView>> {
        let comments = self.repos.comments.list_by_post(post_id).await?;
        enrich_comments(&self.repos, comments).await
    }

    pub async fn create(
        &self,
        actor: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> DomainResult<CommentView> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }

        if self.repos.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let comment = self
            .repos
            .comments
            .insert(Comment::new(post_id, actor, content.to_string()))
            .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment created");

        let mut views = enrich_comments(&self.repos, vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("comment vanished during assembly".to_string()))
    }

    /// Delete a comment. Who may do so depends on the configured policy.
    /// Returns whether a row was removed; a missing comment is `false`.
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> DomainResult<bool> {
        if self.delete_policy == CommentDeletePolicy::AuthorOnly {
            let Some(comment) = self.repos.comments.find_by_id(id).await? else {
                return Ok(false);
            };
            ensure_can_mutate(actor, &comment)?;
        }

        let removed = self.repos.comments.delete(id).await?;
        tracing::info!(comment_id = %id, actor = %actor, removed, "Comment deleted");
        Ok(removed)
    }
}
