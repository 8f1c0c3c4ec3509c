// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod utils;

pub use auth::{Actor, AuthError, Role};
pub use entity_ids::{ArtisanId, Id, JobId, MatchingLogId, ServiceCategoryId, UserId};
