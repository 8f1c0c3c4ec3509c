//! Kernel module - server infrastructure and dependencies.

pub mod cache;
pub mod deps;
pub mod pg_store;
pub mod test_dependencies;
pub mod traits;

pub use cache::TtlCache;
pub use deps::{ttl_category_cache, CategoryCache, ServerDeps};
pub use pg_store::PgMarketplaceStore;
pub use test_dependencies::{
    ArtisanSeed, InMemoryMarketplaceStore, MulticastCall, SpyPushNotificationService,
    TestDependencies,
};
pub use traits::*;
