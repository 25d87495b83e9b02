//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::authorization::Policies;
use inkwell_core::ports::{ImageStore, PasswordService, TokenService};
use inkwell_core::services::{
    AccountService, CategoryService, CommentService, LikeService, PostService, Repositories,
    UserService,
};
use inkwell_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService, LocalImageStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub users: UserService,
    pub categories: CategoryService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub uploads: Arc<LocalImageStore>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Wire the services over a set of repositories.
    pub fn assemble(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        uploads: Arc<LocalImageStore>,
        policies: Policies,
    ) -> Self {
        let images: Arc<dyn ImageStore> = uploads.clone();

        Self {
            accounts: AccountService::new(repos.clone(), passwords, tokens.clone()),
            users: UserService::new(repos.clone(), images.clone(), policies.user_deletion),
            categories: CategoryService::new(repos.clone()),
            posts: PostService::new(repos.clone(), images),
            comments: CommentService::new(repos.clone(), policies.comment_delete),
            likes: LikeService::new(repos),
            uploads,
            tokens,
        }
    }

    /// Build the application state from configuration, connecting to
    /// PostgreSQL when configured and falling back to in-memory storage.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let repos = Self::repositories(config).await?;

        let uploads = Arc::new(LocalImageStore::new(&config.upload_dir));
        uploads.init().await?;
        tracing::info!(dir = %config.upload_dir.display(), "Upload directory ready");

        let state = Self::assemble(
            repos,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            uploads,
            config.policies,
        );

        tracing::info!(policies = ?config.policies, "Application state initialized");
        Ok(state)
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
        use migration::{Migrator, MigratorTrait};

        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(InMemoryDatabase::new().repositories());
        };

        match inkwell_infra::connect(db_config).await {
            Ok(db) => {
                if config.run_migrations {
                    Migrator::up(&db, None).await?;
                    tracing::info!("Migrations applied");
                }
                Ok(inkwell_infra::postgres_repositories(db))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Ok(InMemoryDatabase::new().repositories())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> anyhow::Result<Repositories> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(InMemoryDatabase::new().repositories())
    }
}
