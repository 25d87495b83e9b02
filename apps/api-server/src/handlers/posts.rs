//! Post handlers.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use inkwell_core::domain::PostFilter;
use inkwell_shared::dto::SuccessResponse;

use super::forms::PostForm;
use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

/// Query string for the post listing. Values are taken leniently: anything
/// unparsable falls back to its default.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub published: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListPostsQuery {
    /// Only the literal `false` selects drafts.
    pub fn into_filter(self) -> PostFilter {
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<u64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        PostFilter {
            published: Some(self.published.as_deref() != Some("false")),
            category_slug: self.category.filter(|c| !c.trim().is_empty()),
            limit,
            offset: self
                .offset
                .and_then(|o| o.trim().parse().ok())
                .unwrap_or(0),
        }
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter();
    let posts = state.posts.list(&filter).await?;

    Ok(HttpResponse::Ok().json(views::posts(posts)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner(), viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// GET /api/posts/slug/{slug}
pub async fn get_post_by_slug(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_slug(&path, viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// POST /api/posts - multipart
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, form.into_input()?)
        .await?;

    Ok(HttpResponse::Created().json(views::post(post)))
}

/// PATCH /api/posts/{id} - multipart, author only
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(identity.user_id, path.into_inner(), form.into_update()?)
        .await?;

    Ok(HttpResponse::Ok().json(views::post(post)))
}

/// DELETE /api/posts/{id} - author only
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let success = state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success }))
}
