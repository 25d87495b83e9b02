//! In-memory storage - used as fallback when PostgreSQL is unavailable, and
//! by the test suites.
//!
//! All five tables live behind a single async `RwLock`, so every repository
//! call sees a consistent snapshot. The same unique keys as the SQL schema
//! are enforced, and deleting a post removes its comments and likes.
//! Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{
    Category, Comment, Like, Post, PostChanges, PostFilter, User, UserChanges,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LikeRepository, PostRepository,
    UserRepository,
};
use inkwell_core::services::Repositories;

use super::mask_email;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<Uuid, Like>,
}

type Shared = Arc<RwLock<Tables>>;

fn duplicate(key: &str) -> RepoError {
    RepoError::Constraint(format!("duplicate key value violates unique constraint \"{key}\""))
}

/// Handle to a set of in-memory tables. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Shared,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// One repository per table, all backed by this database.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryUserRepository(self.tables.clone())),
            categories: Arc::new(InMemoryCategoryRepository(self.tables.clone())),
            posts: Arc::new(InMemoryPostRepository(self.tables.clone())),
            comments: Arc::new(InMemoryCommentRepository(self.tables.clone())),
            likes: Arc::new(InMemoryLikeRepository(self.tables.clone())),
        }
    }
}

pub struct InMemoryUserRepository(Shared);
pub struct InMemoryCategoryRepository(Shared);
pub struct InMemoryPostRepository(Shared);
pub struct InMemoryCommentRepository(Shared);
pub struct InMemoryLikeRepository(Shared);

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.0.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.write().await;

        if tables.users.contains_key(&user.id) {
            return Err(duplicate("users_pkey"));
        }
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(duplicate("users_username_key"));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(duplicate("users_email_key"));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.0.write().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.0.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let tables = self.0.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, RepoError> {
        let mut tables = self.0.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.0.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.0.write().await;

        if tables.categories.contains_key(&category.id) {
            return Err(duplicate("categories_pkey"));
        }
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(duplicate("categories_slug_key"));
        }

        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.0.write().await;
        let removed = tables.categories.remove(&id).is_some();

        if removed {
            for post in tables.posts.values_mut() {
                if post.category_id == Some(id) {
                    post.category_id = None;
                }
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.0.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let tables = self.0.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.0.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.write().await;

        if tables.posts.contains_key(&post.id) {
            return Err(duplicate("posts_pkey"));
        }
        if tables.posts.values().any(|p| p.slug == post.slug) {
            return Err(duplicate("posts_slug_key"));
        }
        if post
            .category_id
            .is_some_and(|id| !tables.categories.contains_key(&id))
        {
            return Err(RepoError::Constraint(
                "insert on table \"posts\" violates foreign key constraint \"fk_posts_category\""
                    .to_string(),
            ));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.0.write().await;
        if tables.posts.remove(&id).is_none() {
            return Ok(false);
        }

        tables.comments.retain(|_, c| c.post_id != id);
        tables.likes.retain(|_, l| l.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.0.read().await;

        let category_id = match &filter.category_slug {
            Some(slug) => {
                let found = tables
                    .categories
                    .values()
                    .find(|c| &c.slug == slug)
                    .map(|c| c.id);
                if found.is_none() {
                    tracing::debug!(category = %slug, "Unknown category slug, filter ignored");
                }
                found
            }
            None => None,
        };

        let matching = tables
            .posts
            .values()
            .filter(|p| filter.published.is_none_or(|published| p.published == published))
            .filter(|p| category_id.is_none_or(|id| p.category_id == Some(id)))
            .cloned()
            .collect();

        Ok(newest_first(matching)
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.0.read().await;
        let posts = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let mut tables = self.0.write().await;
        Ok(tables.posts.get_mut(&id).map(|post| {
            changes.apply(post);
            post.clone()
        }))
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.0.write().await;

        let doomed: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .map(|p| p.id)
            .collect();

        for id in &doomed {
            tables.posts.remove(id);
        }
        tables.comments.retain(|_, c| !doomed.contains(&c.post_id));
        tables.likes.retain(|_, l| !doomed.contains(&l.post_id));

        Ok(doomed.len() as u64)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.0.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.0.write().await;

        if tables.comments.contains_key(&comment.id) {
            return Err(duplicate("comments_pkey"));
        }
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(
                "insert on table \"comments\" violates foreign key constraint \"fk_comments_post\""
                    .to_string(),
            ));
        }

        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.0.write().await.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.0.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.0.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|_, c| c.author_id != author_id);
        Ok((before - tables.comments.len()) as u64)
    }
}

#[async_trait]
impl BaseRepository<Like, Uuid> for InMemoryLikeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Like>, RepoError> {
        Ok(self.0.read().await.likes.get(&id).cloned())
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut tables = self.0.write().await;

        if tables.likes.contains_key(&like.id) {
            return Err(duplicate("likes_pkey"));
        }
        if tables
            .likes
            .values()
            .any(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Err(duplicate("idx_likes_post_user"));
        }
        if !tables.posts.contains_key(&like.post_id) {
            return Err(RepoError::Constraint(
                "insert on table \"likes\" violates foreign key constraint \"fk_likes_post\""
                    .to_string(),
            ));
        }

        tables.likes.insert(like.id, like.clone());
        Ok(like)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.0.write().await.likes.remove(&id).is_some())
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables
            .likes
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_user_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables
            .likes
            .values()
            .find(|l| l.post_id == post_id && l.user_id == user_id)
            .cloned())
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let tables = self.0.read().await;
        let mut counts = HashMap::new();
        for like in tables.likes.values().filter(|l| post_ids.contains(&l.post_id)) {
            *counts.entry(like.post_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.0.write().await;
        let before = tables.likes.len();
        tables.likes.retain(|_, l| l.user_id != user_id);
        Ok((before - tables.likes.len()) as u64)
    }
}
