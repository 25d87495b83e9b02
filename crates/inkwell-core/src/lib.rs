//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend: entities, repository
//! ports, the ownership rule and the use-case services built on top of them.
//! Nothing in here knows about HTTP or a particular database.

pub mod authorization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, DomainResult, RepoError};
