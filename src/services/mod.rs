//! Business logic layered over the entity store.

pub mod auth;
pub mod workspace;
