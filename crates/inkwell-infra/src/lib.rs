//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`:
//! PostgreSQL and in-memory repositories, JWT/Argon2 auth, and the local
//! image store.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory storage only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::InMemoryDatabase;
pub use storage::LocalImageStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect, postgres_repositories};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
