//! Typed ID definitions for the marketplace entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User accounts (customers and artisans share an account).
pub struct User;

/// Marker type for Artisan profiles.
pub struct Artisan;

/// Marker type for Job requests.
pub struct Job;

/// Marker type for ServiceCategory entries.
pub struct ServiceCategory;

/// Marker type for JobMatchingLog rows.
pub struct JobMatchingLog;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type ArtisanId = Id<Artisan>;

pub type JobId = Id<Job>;

pub type ServiceCategoryId = Id<ServiceCategory>;

pub type MatchingLogId = Id<JobMatchingLog>;
