pub mod auth;
pub mod estimates;
pub mod jobs;
pub mod matching;
pub mod service_categories;
