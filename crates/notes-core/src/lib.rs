//! notes-core: shared types for the notes client
//!
//! This crate provides:
//! - Domain types (users, private notes, public notes, partial updates)
//! - Request/response bodies of the notes REST API
//! - The server's error body, including field-level validation errors

pub mod api;
pub mod types;

pub use api::*;
pub use types::*;
