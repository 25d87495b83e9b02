//! Domain entities - the core business objects.

mod category;
mod comment;
mod like;
mod post;
pub mod slug;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use like::Like;
pub use post::{NewPost, Post, PostChanges, PostFilter};
pub use user::{User, UserChanges};
