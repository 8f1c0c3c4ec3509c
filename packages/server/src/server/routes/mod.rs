// HTTP routes
pub mod estimates;
pub mod health;
pub mod jobs;

pub use estimates::*;
pub use health::*;
pub use jobs::*;
