//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use inkwell_core::authorization::{CommentDeletePolicy, Policies, UserDeletionPolicy};
use inkwell_infra::JwtConfig;
#[cfg(feature = "postgres")]
use inkwell_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub upload_dir: PathBuf,
    pub jwt: JwtConfig,
    pub policies: Policies,
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl AppConfig {
    /// Load configuration from environment variables. Unknown policy values
    /// are an error rather than a silent fallback.
    pub fn from_env() -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_env("DB_MAX_CONNECTIONS").unwrap_or(20),
                min_connections: parse_env("DB_MIN_CONNECTIONS").unwrap_or(2),
            });

        let user_deletion = match env::var("BLOG_USER_DELETION_POLICY") {
            Ok(value) => value
                .parse::<UserDeletionPolicy>()
                .context("BLOG_USER_DELETION_POLICY")?,
            Err(_) => UserDeletionPolicy::default(),
        };
        let comment_delete = match env::var("BLOG_COMMENT_DELETE_POLICY") {
            Ok(value) => value
                .parse::<CommentDeletePolicy>()
                .context("BLOG_COMMENT_DELETE_POLICY")?,
            Err(_) => CommentDeletePolicy::default(),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            run_migrations: flag("RUN_MIGRATIONS"),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            jwt: JwtConfig::from_env(),
            policies: Policies {
                user_deletion,
                comment_delete,
            },
        })
    }
}
