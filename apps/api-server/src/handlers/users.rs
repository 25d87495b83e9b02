//! User profile handlers.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::SuccessResponse;

use super::forms::ProfileForm;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users/{id}
pub async fn get_user(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let user = state.users.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// GET /api/users/{id}/posts
pub async fn list_user_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::posts(posts)))
}

/// PATCH /api/users/{id} - multipart `fullName`, `bio`, `profilePicture`
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<ProfileForm>,
) -> AppResult<HttpResponse> {
    let (full_name, bio, picture) = form.into_parts();

    let user = state
        .users
        .update(identity.user_id, path.into_inner(), full_name, bio, picture)
        .await?;

    Ok(HttpResponse::Ok().json(views::user(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.users.delete(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
