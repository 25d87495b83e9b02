//! Post reads, creation and owner-only mutations.

use std::sync::Arc;

use uuid::Uuid;

use crate::authorization::ensure_can_mutate;
use crate::domain::{NewPost, Post, PostChanges, PostFilter};
use crate::error::{DomainError, DomainResult};
use crate::ports::{BaseRepository, ImageStore, UploadedImage};

use super::assembly::{enrich_post, enrich_posts};
use super::{PostView, Repositories, non_blank};

const MAX_TITLE_LEN: usize = 200;

/// A new post as submitted by its author.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    /// Category id or slug.
    pub category: Option<String>,
    /// Defaults to published.
    pub published: Option<bool>,
    pub featured_image: Option<UploadedImage>,
}

/// A partial post update. Absent fields are left untouched; a blank
/// `excerpt` or `category` clears it.
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
    pub featured_image: Option<UploadedImage>,
}

#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
    images: Arc<dyn ImageStore>,
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.is_empty() {
        return Err(DomainError::validation("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation("title must be at most 200 characters"));
    }
    Ok(())
}

impl PostService {
    pub fn new(repos: Repositories, images: Arc<dyn ImageStore>) -> Self {
        Self { repos, images }
    }

    async fn find(&self, id: Uuid) -> DomainResult<Post> {
        self.repos
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Resolve a category reference given either as an id or as a slug.
    async fn resolve_category(&self, reference: Option<String>) -> DomainResult<Option<Uuid>> {
        let Some(reference) = non_blank(reference) else {
            return Ok(None);
        };

        let category = match Uuid::parse_str(&reference) {
            Ok(id) => self.repos.categories.find_by_id(id).await?,
            Err(_) => self.repos.categories.find_by_slug(&reference).await?,
        };

        category
            .map(|c| Some(c.id))
            .ok_or_else(|| DomainError::validation(format!("Unknown category: {reference}")))
    }

    async fn store_image(&self, image: Option<UploadedImage>) -> DomainResult<Option<String>> {
        match image {
            Some(image) => Ok(Some(self.images.save(image).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self, filter: &PostFilter) -> DomainResult<Vec<PostView>> {
        let posts = self.repos.posts.list(filter).await?;
        enrich_posts(&self.repos, posts).await
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> DomainResult<Vec<PostView>> {
        if self.repos.users.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User", author_id));
        }

        let posts = self.repos.posts.list_by_author(author_id).await?;
        enrich_posts(&self.repos, posts).await
    }

    pub async fn get(&self, id: Uuid, viewer: Option<Uuid>) -> DomainResult<PostView> {
        let post = self.find(id).await?;
        enrich_post(&self.repos, post, viewer).await
    }

    pub async fn get_by_slug(&self, slug: &str, viewer: Option<Uuid>) -> DomainResult<PostView> {
        let post = self
            .repos
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", slug))?;
        enrich_post(&self.repos, post, viewer).await
    }

    pub async fn create(&self, actor: Uuid, input: PostInput) -> DomainResult<PostView> {
        let title = input.title.trim().to_string();
        validate_title(&title)?;
        if input.content.trim().is_empty() {
            return Err(DomainError::validation("content is required"));
        }
        if let Some(image) = &input.featured_image {
            image.validate()?;
        }

        let category_id = self.resolve_category(input.category).await?;
        let featured_image = self.store_image(input.featured_image).await?;

        let post = Post::new(
            actor,
            NewPost {
                title,
                content: input.content,
                excerpt: non_blank(input.excerpt),
                featured_image,
                category_id,
                published: input.published.unwrap_or(true),
            },
        );
        let post = self.repos.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, published = post.published, "Post created");
        enrich_post(&self.repos, post, Some(actor)).await
    }

    /// Only the author may update a post. The slug never changes.
    pub async fn update(&self, actor: Uuid, id: Uuid, input: PostUpdate) -> DomainResult<PostView> {
        let post = self.find(id).await?;
        ensure_can_mutate(actor, &post)?;

        let title = input.title.map(|t| t.trim().to_string());
        if let Some(title) = &title {
            validate_title(title)?;
        }
        if input.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(DomainError::validation("content must not be empty"));
        }
        if let Some(image) = &input.featured_image {
            image.validate()?;
        }

        let category_id = match input.category {
            Some(reference) => Some(self.resolve_category(Some(reference)).await?),
            None => None,
        };
        let featured_image = self.store_image(input.featured_image).await?;

        let changes = PostChanges {
            title,
            content: input.content,
            excerpt: input.excerpt.map(|e| non_blank(Some(e))),
            featured_image,
            category_id,
            published: input.published,
        };

        let post = self
            .repos
            .posts
            .update(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        tracing::info!(post_id = %post.id, "Post updated");
        enrich_post(&self.repos, post, Some(actor)).await
    }

    /// Only the author may delete a post. Returns whether a row was removed.
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> DomainResult<bool> {
        let post = self.find(id).await?;
        ensure_can_mutate(actor, &post)?;

        let removed = self.repos.posts.delete(id).await?;
        tracing::info!(post_id = %id, removed, "Post deleted");
        Ok(removed)
    }
}
