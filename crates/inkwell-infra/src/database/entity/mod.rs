//! SeaORM entities, one per table. Each converts to and from its domain type.

pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod user;
