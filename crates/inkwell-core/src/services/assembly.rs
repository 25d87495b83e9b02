//! Response assembly - attaches author, category and like information to
//! posts and comments before they leave the core.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::{Category, Comment, Post, User};
use crate::error::DomainResult;
use crate::ports::BaseRepository;

use super::Repositories;

/// The public face of a user when shown next to their content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    /// `None` when the author no longer exists.
    pub author: Option<AuthorSummary>,
    pub category: Option<Category>,
    pub likes_count: u64,
    /// Only computed for single-post reads.
    pub user_liked: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Option<AuthorSummary>,
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

async fn authors_by_id(
    repos: &Repositories,
    ids: impl Iterator<Item = Uuid>,
) -> DomainResult<HashMap<Uuid, AuthorSummary>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = repos.users.find_many(&ids).await?;
    Ok(users
        .iter()
        .map(|user| (user.id, AuthorSummary::from(user)))
        .collect())
}

/// Enrich a page of posts with one query per related table.
pub(crate) async fn enrich_posts(
    repos: &Repositories,
    posts: Vec<Post>,
) -> DomainResult<Vec<PostView>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let authors = authors_by_id(repos, posts.iter().map(|p| p.author_id)).await?;

    let category_ids = unique_ids(posts.iter().filter_map(|p| p.category_id));
    let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        repos
            .categories
            .find_many(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let likes = repos.likes.count_by_posts(&post_ids).await?;

    tracing::debug!(
        posts = posts.len(),
        authors = authors.len(),
        categories = categories.len(),
        "Enriched post page"
    );

    Ok(posts
        .into_iter()
        .map(|post| PostView {
            author: authors.get(&post.author_id).cloned(),
            category: post.category_id.and_then(|id| categories.get(&id).cloned()),
            likes_count: likes.get(&post.id).copied().unwrap_or(0),
            user_liked: None,
            post,
        })
        .collect())
}

/// Enrich one post, including whether `viewer` has liked it.
pub(crate) async fn enrich_post(
    repos: &Repositories,
    post: Post,
    viewer: Option<Uuid>,
) -> DomainResult<PostView> {
    let author = repos
        .users
        .find_by_id(post.author_id)
        .await?
        .as_ref()
        .map(AuthorSummary::from);

    let category = match post.category_id {
        Some(id) => repos.categories.find_by_id(id).await?,
        None => None,
    };

    let likes = repos.likes.list_by_post(post.id).await?;
    let user_liked = viewer.is_some_and(|viewer| likes.iter().any(|l| l.user_id == viewer));

    Ok(PostView {
        author,
        category,
        likes_count: likes.len() as u64,
        user_liked: Some(user_liked),
        post,
    })
}

pub(crate) async fn enrich_comments(
    repos: &Repositories,
    comments: Vec<Comment>,
) -> DomainResult<Vec<CommentView>> {
    let authors = authors_by_id(repos, comments.iter().map(|c| c.author_id)).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentView {
            author: authors.get(&comment.author_id).cloned(),
            comment,
        })
        .collect())
}
