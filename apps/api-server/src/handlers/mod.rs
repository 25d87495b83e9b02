//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod forms;
mod health;
mod likes;
mod posts;
mod uploads;
mod users;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/users")
                    .route("/{id}", web::get().to(users::get_user))
                    .route("/{id}", web::patch().to(users::update_user))
                    .route("/{id}", web::delete().to(users::delete_user))
                    .route("/{id}/posts", web::get().to(users::list_user_posts)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list_categories))
                    .route("", web::post().to(categories::create_category)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/slug/{slug}", web::get().to(posts::get_post_by_slug))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::patch().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{post_id}/comments", web::get().to(comments::list_comments))
                    .route("/{post_id}/comments", web::post().to(comments::create_comment))
                    .route("/{post_id}/like", web::post().to(likes::toggle_like)),
            )
            .route("/comments/{id}", web::delete().to(comments::delete_comment)),
    )
    .route("/uploads/{file}", web::get().to(uploads::serve_upload));
}
