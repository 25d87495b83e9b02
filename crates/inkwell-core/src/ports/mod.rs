//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod image_store;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use image_store::{ImageStore, MAX_IMAGE_BYTES, UploadedImage};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, LikeRepository, PostRepository,
    UserRepository,
};
