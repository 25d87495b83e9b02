//! Persistence gateway - one trait per entity over a shared CRUD base.
//!
//! Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
//! storage failures. No method spans more than one logical statement.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Like, Post, PostChanges, PostFilter, User, UserChanges};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-index violations yield
    /// [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns `true` iff a row was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup used by listing enrichment. Unknown ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Newest first. An unknown `category_slug` drops the category filter
    /// rather than matching nothing.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Every post by one author, newest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Apply `changes` and stamp `updated_at`. `None` if the post is missing.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError>;

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Oldest first.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait LikeRepository: BaseRepository<Like, Uuid> {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError>;

    async fn find_user_like(&self, post_id: Uuid, user_id: Uuid)
    -> Result<Option<Like>, RepoError>;

    /// Like counts keyed by post id. Posts without likes are absent.
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError>;

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, RepoError>;
}
