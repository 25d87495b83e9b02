//! Authentication handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::services::Registration;
use inkwell_shared::dto::{LoginRequest, RegisterRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let session = state
        .accounts
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(views::session(session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(views::session(session)))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.me(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}
