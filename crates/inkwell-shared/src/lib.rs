//! # Inkwell Shared
//!
//! Wire types shared by the server and any Rust client: request bodies,
//! response payloads and the RFC 7807 error body.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
