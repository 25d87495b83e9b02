use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::{CommentResponse, CreateCommentRequest, SuccessResponse};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{post_id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments: Vec<CommentResponse> = state
        .comments
        .list(path.into_inner())
        .await?
        .into_iter()
        .map(views::comment)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/posts/{post_id}/comments
pub async fn create_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(identity.user_id, path.into_inner(), &body.content)
        .await?;

    Ok(HttpResponse::Created().json(views::comment(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let success = state
        .comments
        .delete(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(SuccessResponse { success }))
}
