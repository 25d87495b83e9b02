use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::post_slug;

/// Post entity - a blog post, published or draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the author when creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub published: bool,
}

impl Post {
    /// Create a new post owned by `author_id`, deriving its slug from the title.
    pub fn new(author_id: Uuid, input: NewPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: post_slug(&input.title),
            title: input.title,
            content: input.content,
            excerpt: input.excerpt,
            featured_image: input.featured_image,
            category_id: input.category_id,
            author_id,
            published: input.published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a post. The slug and author never change.
///
/// For the nullable columns the outer `Option` says whether to touch the
/// column and the inner one is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub featured_image: Option<String>,
    pub category_id: Option<Option<Uuid>>,
    pub published: Option<bool>,
}

impl PostChanges {
    /// Apply the changes in place. `updated_at` is stamped even when nothing
    /// else changed.
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(image) = self.featured_image {
            post.featured_image = Some(image);
        }
        if let Some(category_id) = self.category_id {
            post.category_id = category_id;
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = Utc::now();
    }
}

/// Listing filter for posts. Present filters are ANDed.
#[derive(Debug, Clone)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category_slug: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            published: Some(true),
            category_slug: None,
            limit: 20,
            offset: 0,
        }
    }
}
