//! Serves stored images back from the upload directory.

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// GET /uploads/{file}
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file_name = path.into_inner();
    let not_found = || AppError::NotFound("File not found".to_string());

    let file_path = state.uploads.resolve(&file_name).ok_or_else(not_found)?;

    let bytes = match tokio::fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::Internal(format!("reading upload: {e}"))),
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type(&file_name)))
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}
