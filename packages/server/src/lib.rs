// Handyman Marketplace - API Core
//
// This crate provides the backend API for matching customer job requests with
// nearby artisans. Domain logic lives in domains/*, infrastructure seams
// (persistence, push delivery, caching) in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
