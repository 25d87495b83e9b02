use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::LikeResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/like - toggles the caller's like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let liked = state
        .likes
        .toggle(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(LikeResponse { liked }))
}
