//! Authorization gate - the single ownership predicate every owner-only
//! mutation goes through, plus the named policies for the cases where the
//! rule is a deployment choice.

use std::str::FromStr;

use uuid::Uuid;

use crate::domain::{Comment, Post, User};
use crate::error::DomainError;

/// A resource with exactly one identity allowed to mutate it.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// A bare id stands for the record it identifies (e.g. `/users/:id`).
impl Owned for Uuid {
    fn owner_id(&self) -> Uuid {
        *self
    }
}

pub fn can_mutate(actor: Uuid, resource: &impl Owned) -> bool {
    actor == resource.owner_id()
}

pub fn ensure_can_mutate(actor: Uuid, resource: &impl Owned) -> Result<(), DomainError> {
    if can_mutate(actor, resource) {
        Ok(())
    } else {
        tracing::debug!(%actor, owner = %resource.owner_id(), "Ownership check failed");
        Err(DomainError::Forbidden)
    }
}

/// What happens to a user's posts, comments and likes when the user is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserDeletionPolicy {
    /// Content stays; author summaries render as `null`.
    #[default]
    Retain,
    /// Likes, comments and posts by the user are deleted first.
    Cascade,
}

/// Who may delete a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentDeletePolicy {
    /// Any authenticated identity may delete any comment.
    #[default]
    AnyAuthenticated,
    AuthorOnly,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown policy value: {0}")]
pub struct ParsePolicyError(String);

impl FromStr for UserDeletionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "cascade" => Ok(Self::Cascade),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

impl FromStr for CommentDeletePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "any-authenticated" | "any" => Ok(Self::AnyAuthenticated),
            "author-only" | "author" => Ok(Self::AuthorOnly),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Policies consulted by the services.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policies {
    pub user_deletion: UserDeletionPolicy,
    pub comment_delete: CommentDeletePolicy,
}
