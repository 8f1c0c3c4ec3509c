//! Job-to-artisan matching: candidate query, scoring, ranking, logging,
//! and notification of the selected artisans.

pub mod activities;
pub mod models;
pub mod utils;

pub use activities::{get_matching_analytics, get_matching_logs, match_artisans_for_job};
pub use models::{JobMatchingLog, JobMatchingResult, MatchOutcome, MatchingAnalytics};
pub use utils::{calculate_match_score, compare_results, rank_candidates};
