//! Storage adapters for the repository ports.

mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use memory::InMemoryDatabase;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLikeRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Repositories sharing one connection pool.
#[cfg(feature = "postgres")]
pub fn postgres_repositories(db: sea_orm::DbConn) -> inkwell_core::services::Repositories {
    use std::sync::Arc;

    inkwell_core::services::Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
        likes: Arc::new(PostgresLikeRepository::new(db)),
    }
}

/// Mask an email for logging to avoid PII in logs: `alice@x.com` becomes
/// `a***@x.com`.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
