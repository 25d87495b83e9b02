use actix_web::{HttpResponse, web};

use inkwell_shared::dto::{CategoryResponse, CreateCategoryRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .categories
        .list()
        .await?
        .into_iter()
        .map(views::category)
        .collect();

    Ok(HttpResponse::Ok().json(categories))
}

/// POST /api/categories
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(&body.name, &body.slug).await?;
    tracing::debug!(user_id = %identity.user_id, slug = %category.slug, "Category added");

    Ok(HttpResponse::Created().json(views::category(category)))
}
