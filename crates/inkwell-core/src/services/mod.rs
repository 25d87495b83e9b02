//! Use-cases composed from gateway calls. Every call is awaited in sequence
//! and no transaction spans them; a later failure leaves earlier writes in
//! place.

mod accounts;
mod assembly;
mod categories;
mod comments;
mod likes;
mod posts;
mod users;

use std::sync::Arc;

use crate::ports::{
    CategoryRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

pub use accounts::{AccountService, Registration, Session};
pub use assembly::{AuthorSummary, CommentView, PostView};
pub use categories::CategoryService;
pub use comments::CommentService;
pub use likes::LikeService;
pub use posts::{PostInput, PostService, PostUpdate};
pub use users::UserService;

/// The five repositories, bundled so services can be built from one value.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
}

/// Trim and drop empty strings; blank form fields mean "not provided".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
